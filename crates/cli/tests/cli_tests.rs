//! CLI integration tests
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("pagelens")
}

const SHOP_HTML: &str = r#"<html>
<head><title>Shop</title></head>
<body>
    <h1>Storefront</h1>
    <select><option>Size S</option></select>
    <p>Everything ships free this week.</p>
    <script>var banner = "Welcome to our store! Browse our new items today.";</script>
</body>
</html>"#;

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_text_file_input() {
    let dir = TempDir::new().unwrap();
    let fixture = write_fixture(&dir, "shop.html", SHOP_HTML);

    cmd()
        .args(["text", &fixture])
        .assert()
        .success()
        .stdout(predicate::str::contains("Storefront"))
        .stdout(predicate::str::contains("Everything ships free this week."))
        .stdout(predicate::str::contains("Welcome to our store!"))
        .stdout(predicate::str::contains("Size S").not());
}

#[test]
fn test_text_stdin_input() {
    cmd()
        .args(["text", "-"])
        .write_stdin(SHOP_HTML)
        .assert()
        .success()
        .stdout(predicate::str::contains("Storefront"));
}

#[test]
fn test_text_all_breakdown() {
    let dir = TempDir::new().unwrap();
    let fixture = write_fixture(&dir, "shop.html", SHOP_HTML);

    cmd()
        .args(["text", "--all", &fixture])
        .assert()
        .success()
        .stdout(predicate::str::contains("script.String"))
        .stdout(predicate::str::contains("keep"))
        .stdout(predicate::str::contains("drop"));
}

#[test]
fn test_text_missing_file_fails() {
    cmd()
        .args(["text", "/nonexistent/page.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_favicon_cache_hit_offline() {
    let dir = TempDir::new().unwrap();
    let defaults = write_fixture(&dir, "defaults.yml", "example.com: http://example.com/icon.png\n");
    let overrides = dir.path().join("overrides.yml");
    let discovered = dir.path().join("discovered.yml");

    cmd()
        .args([
            "favicon",
            "http://example.com/articles/42",
            "--defaults",
            &defaults,
            "--overrides",
            &overrides.to_string_lossy(),
            "--discovered",
            &discovered.to_string_lossy(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://example.com/icon.png"))
        .stdout(predicate::str::contains("cache"));
}

#[test]
fn test_favicon_invalid_url_fails() {
    cmd()
        .args(["favicon", "not a url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid page URL"));
}
