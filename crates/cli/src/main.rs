use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use pagelens_core::{
    FaviconCacheBuilder, FaviconResolver, FetchConfig, HttpFetcher, PageUrl, RankConfig, ResolveMode, ResolverConfig,
    SalienceWalker, ValidationState, render_salient_text,
};
use pagelens_core::fetch::Fetch;
use url::Url;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve page favicons and extract salient text from captured HTML
#[derive(Parser, Debug)]
#[command(name = "pagelens")]
#[command(author = "Pagelens Contributors")]
#[command(version = VERSION)]
#[command(about = "Resolve favicons and extract salient page text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose progress output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve and rank favicon candidates for a page URL
    Favicon(FaviconArgs),
    /// Extract salient human-readable text from HTML
    Text(TextArgs),
}

#[derive(Parser, Debug)]
struct FaviconArgs {
    /// Page URL the favicon belongs to
    #[arg(value_name = "URL")]
    url: String,

    /// Captured page HTML to scan for <link> declarations
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Enumerate every candidate instead of stopping at the best one
    #[arg(long)]
    all: bool,

    /// Icon edge length the consumer renders at
    #[arg(long, default_value = "20", value_name = "PX")]
    target_width: u32,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "5", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for validation fetches
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Base URL of the ICO/SVG conversion endpoints
    #[arg(long, value_name = "URL")]
    proxy_base: Option<String>,

    /// Overrides store (highest precedence)
    #[arg(long, value_name = "FILE")]
    overrides: Option<PathBuf>,

    /// Curated defaults store
    #[arg(long, value_name = "FILE")]
    defaults: Option<PathBuf>,

    /// Auto-discovered store (the only one written to)
    #[arg(long, value_name = "FILE")]
    discovered: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct TextArgs {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Print the annotated per-element breakdown instead of kept text
    #[arg(long)]
    all: bool,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "5", value_name = "SECS")]
    timeout: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        echo::print_banner();
    }

    match cli.command {
        Command::Favicon(args) => run_favicon(args, cli.verbose).await,
        Command::Text(args) => run_text(args, cli.verbose).await,
    }
}

async fn run_favicon(args: FaviconArgs, verbose: bool) -> anyhow::Result<()> {
    let page = PageUrl::parse(&args.url).with_context(|| format!("Invalid page URL: {}", args.url))?;

    let html = match &args.html {
        Some(path) => Some(fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?),
        None => None,
    };

    if verbose {
        echo::print_step(1, 2, &format!("Resolving favicons for {}", page.as_str()));
    }

    let mut cache = FaviconCacheBuilder::new();
    if let Some(path) = &args.overrides {
        cache = cache.overrides_path(path);
    }
    if let Some(path) = &args.defaults {
        cache = cache.defaults_path(path);
    }
    if let Some(path) = &args.discovered {
        cache = cache.discovered_path(path);
    }

    let proxy_base = match &args.proxy_base {
        Some(raw) => Some(Url::parse(raw).with_context(|| format!("Invalid proxy base: {}", raw))?),
        None => None,
    };

    let config = ResolverConfig {
        fetch: FetchConfig {
            timeout: args.timeout,
            user_agent: args.user_agent.unwrap_or_else(|| pagelens_core::fetch::DEFAULT_USER_AGENT.to_string()),
        },
        rank: RankConfig { target_width: args.target_width, ..Default::default() },
        proxy_base,
        max_validated: if args.all { usize::MAX } else { 1 },
    };

    let resolver = FaviconResolver::new(cache.build(), Arc::new(HttpFetcher), config);
    let mode = if args.all { ResolveMode::All } else { ResolveMode::BestOnly };
    let candidates = resolver.resolve_page(&page, html.as_deref(), mode).await;

    if verbose {
        echo::print_step(2, 2, &format!("{} candidate(s)", candidates.len()));
    }

    if candidates.is_empty() {
        echo::print_error("No favicon found");
        return Ok(());
    }

    for candidate in &candidates {
        let marker = match candidate.state() {
            _ if candidate.is_cache_sourced() => "cache".to_string(),
            ValidationState::Valid => "valid".to_string(),
            ValidationState::Invalid => "invalid".to_string(),
            ValidationState::Unvalidated => "unchecked".to_string(),
        };
        let media = if candidate.media_type.is_empty() { "-" } else { &candidate.media_type };
        println!(
            "{:9} {:12} {:>4}x{:<4} {}",
            marker.dimmed(),
            media,
            candidate.width,
            candidate.height,
            candidate.href
        );
    }

    Ok(())
}

async fn run_text(args: TextArgs, verbose: bool) -> anyhow::Result<()> {
    let html = if args.input == "-" {
        if verbose {
            echo::print_step(1, 3, "Reading from stdin");
        }
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else if args.input.starts_with("http://") || args.input.starts_with("https://") {
        if verbose {
            echo::print_step(1, 3, &format!("Fetching from {}", args.input));
        }
        let url = Url::parse(&args.input).with_context(|| format!("Invalid URL: {}", args.input))?;
        let config = FetchConfig { timeout: args.timeout, ..Default::default() };
        let resource = HttpFetcher
            .fetch(&url, &config)
            .await
            .context("Failed to fetch URL")?;
        String::from_utf8_lossy(&resource.bytes).into_owned()
    } else {
        if verbose {
            echo::print_step(1, 3, &format!("Reading from file {}", args.input));
        }
        fs::read_to_string(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?
    };

    if verbose {
        echo::print_step(2, 3, "Walking parsed HTML");
    }

    let walker = SalienceWalker::new();
    let elements = walker.walk_html(&html);

    if verbose {
        echo::print_step(3, 3, &format!("{} elements", elements.len()));
        echo::print_success("Done");
    }

    if args.all {
        for element in &elements {
            let keep = if element.keep { "keep" } else { "drop" };
            println!(
                "{:>3} {:4} {:24} L={:<3} W={:>3}/{:<3} {:18} | {}",
                element.depth,
                keep,
                element.display_name(),
                element.lines.len(),
                element.word_count,
                element.token_count,
                element.text_label,
                element.text.replace('\n', "\\n"),
            );
        }
    } else {
        let text = render_salient_text(&elements);
        if text.is_empty() {
            echo::print_info("No salient text found");
        } else {
            println!("{}", text);
        }
    }

    Ok(())
}
