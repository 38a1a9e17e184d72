//! The HTML salience walk.
//!
//! Walks a parsed document depth-first and emits an arena of
//! [`SoupElement`]s in document order. Scripts are mined for string
//! literals, and literals that turn out to be embedded HTML fragments are
//! parsed and recursed so client-side templates get classified by the same
//! rules as top-level markup.

use ego_tree::NodeRef;
use scraper::{Html, Node};

use super::script;
use super::soup::{CONTAINER_TAGS, EXCLUDE_TAG, SCRIPT_STRING_NAME, SalienceConfig, SoupElement};
use crate::lexicon::{Lexicon, looks_like_html};

/// Walks parsed HTML into salience-annotated elements.
pub struct SalienceWalker {
    lexicon: Lexicon,
    config: SalienceConfig,
}

impl Default for SalienceWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl SalienceWalker {
    /// Walker with the bundled lexicon and default thresholds.
    pub fn new() -> Self {
        Self { lexicon: Lexicon::bundled(), config: SalienceConfig::default() }
    }

    /// Walker with an explicit lexicon and threshold configuration.
    pub fn with(lexicon: Lexicon, config: SalienceConfig) -> Self {
        Self { lexicon, config }
    }

    /// Walks the whole document, returning elements in document order.
    pub fn walk_document(&self, html: &Html) -> Vec<SoupElement> {
        let mut arena = Vec::new();
        for child in html.tree.root().children() {
            self.walk_node(child, 0, None, None, false, &mut arena);
        }
        arena
    }

    /// Convenience: parse and walk in one step.
    pub fn walk_html(&self, html: &str) -> Vec<SoupElement> {
        self.walk_document(&Html::parse_document(html))
    }

    fn walk_node(
        &self,
        node: NodeRef<'_, Node>,
        depth: usize,
        parent: Option<usize>,
        parent_name: Option<&str>,
        excluded: bool,
        arena: &mut Vec<SoupElement>,
    ) {
        match node.value() {
            Node::Element(el) => {
                let name = el.name().to_string();

                if name == "script" {
                    self.walk_script(node, depth, parent, parent_name, excluded, arena);
                } else if CONTAINER_TAGS.contains(&name.as_str()) {
                    self.emit_container(node, &name, depth, parent, parent_name, excluded, arena);
                } else {
                    let child_excluded = excluded || name == EXCLUDE_TAG;
                    let index = arena.len();
                    arena.push(self.element(
                        depth,
                        parent,
                        parent_name.map(String::from),
                        Some(name.clone()),
                        String::new(),
                        excluded,
                    ));

                    for child in node.children() {
                        self.walk_node(child, depth + 1, Some(index), Some(&name), child_excluded, arena);
                    }
                }
            }
            Node::Text(text) => {
                let text: &str = &text;
                if !text.is_empty() {
                    arena.push(self.element(
                        depth,
                        parent,
                        parent_name.map(String::from),
                        None,
                        text.to_string(),
                        excluded,
                    ));
                }
            }
            // Comments, doctypes and processing instructions carry no
            // visible text.
            _ => {}
        }
    }

    /// Emits the marker element for a `<script>` tag, then one element per
    /// string literal in its body. HTML-like literals are parsed as
    /// fragments and recursed under the literal's element.
    fn walk_script(
        &self,
        node: NodeRef<'_, Node>,
        depth: usize,
        parent: Option<usize>,
        parent_name: Option<&str>,
        excluded: bool,
        arena: &mut Vec<SoupElement>,
    ) {
        let marker = arena.len();
        arena.push(self.element(
            depth,
            parent,
            parent_name.map(String::from),
            Some("script".to_string()),
            String::new(),
            excluded,
        ));

        let body: String = node
            .children()
            .filter_map(|child| match child.value() {
                Node::Text(text) => Some(text.to_string()),
                _ => None,
            })
            .collect();
        let body = body.trim();
        if body.is_empty() {
            return;
        }

        for raw in script::string_literals(body) {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }

            let evaluated = script::evaluate_escapes(raw);
            if evaluated.trim().is_empty() {
                continue;
            }

            if looks_like_html(&evaluated) {
                // The literal is an embedded fragment: give it an empty
                // synthetic element and classify its markup recursively.
                let literal = arena.len();
                arena.push(self.element(
                    depth + 1,
                    Some(marker),
                    Some("script".to_string()),
                    Some(SCRIPT_STRING_NAME.to_string()),
                    String::new(),
                    excluded,
                ));

                let fragment = Html::parse_fragment(&evaluated);
                for child in fragment.tree.root().children() {
                    self.walk_fragment_child(child, depth + 2, literal, excluded, arena);
                }
            } else {
                arena.push(self.element(
                    depth + 1,
                    Some(marker),
                    Some("script".to_string()),
                    Some(SCRIPT_STRING_NAME.to_string()),
                    evaluated,
                    excluded,
                ));
            }
        }
    }

    /// Steps over the synthetic `<html>` wrapper that fragment parsing
    /// introduces, so fragment children hang directly off the literal.
    fn walk_fragment_child(
        &self,
        node: NodeRef<'_, Node>,
        depth: usize,
        literal: usize,
        excluded: bool,
        arena: &mut Vec<SoupElement>,
    ) {
        if let Node::Element(el) = node.value()
            && el.name() == "html"
        {
            for child in node.children() {
                self.walk_node(child, depth, Some(literal), Some(SCRIPT_STRING_NAME), excluded, arena);
            }
            return;
        }
        self.walk_node(node, depth, Some(literal), Some(SCRIPT_STRING_NAME), excluded, arena);
    }

    /// Emits one flattened element for a container tag, without recursing
    /// its children into the arena.
    #[allow(clippy::too_many_arguments)]
    fn emit_container(
        &self,
        node: NodeRef<'_, Node>,
        name: &str,
        depth: usize,
        parent: Option<usize>,
        parent_name: Option<&str>,
        excluded: bool,
        arena: &mut Vec<SoupElement>,
    ) {
        let mut text = String::new();
        collect_inline_text(node, &mut text);
        if matches!(name, "pre" | "code") {
            // Preserve block separation in the final output.
            text.push('\n');
        }

        arena.push(self.element(
            depth,
            parent,
            parent_name.map(String::from),
            Some(name.to_string()),
            text,
            excluded,
        ));
    }

    fn element(
        &self,
        depth: usize,
        parent: Option<usize>,
        parent_name: Option<String>,
        name: Option<String>,
        text: String,
        excluded: bool,
    ) -> SoupElement {
        SoupElement::new(&self.lexicon, &self.config, depth, parent, parent_name, name, text, excluded)
    }
}

/// Flattens descendant text into one string. A `<div>` boundary becomes a
/// single space so text on either side does not glue into one word.
fn collect_inline_text(node: NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&text),
            Node::Element(el) => {
                if el.name() == "div" {
                    out.push(' ');
                }
                collect_inline_text(child, out);
            }
            _ => {}
        }
    }
}

/// Renders the kept text of a walked document: kept lines of kept elements
/// in document order, with runs of blank lines collapsed to one.
pub fn render_salient_text(elements: &[SoupElement]) -> String {
    let mut out: Vec<&str> = Vec::new();

    for element in elements {
        if !element.keep {
            continue;
        }
        for line in &element.lines {
            if !line.keep {
                continue;
            }
            if line.text.trim().is_empty() && out.last().is_none_or(|prev| prev.trim().is_empty()) {
                continue;
            }
            out.push(&line.text);
        }
    }

    while out.last().is_some_and(|line| line.trim().is_empty()) {
        out.pop();
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(html: &str) -> Vec<SoupElement> {
        SalienceWalker::new().walk_html(html)
    }

    fn rendered(html: &str) -> String {
        render_salient_text(&walk(html))
    }

    #[test]
    fn test_walk_plain_text() {
        let output = rendered("<html><body><div>Hello world</div></body></html>");
        assert_eq!(output, "Hello world");
    }

    #[test]
    fn test_walk_emits_document_order() {
        let elements = walk("<html><body><div>first</div><div>second</div></body></html>");
        let texts: Vec<&str> = elements
            .iter()
            .filter(|e| e.name.is_none())
            .map(|e| e.text.trim())
            .filter(|t| !t.is_empty())
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_parent_indices_are_consistent() {
        let elements = walk("<html><body><div><b>deep</b></div></body></html>");
        for (i, element) in elements.iter().enumerate() {
            if let Some(parent) = element.parent {
                assert!(parent < i, "parent index must point backward in the arena");
                assert!(elements[parent].depth < element.depth);
            }
        }
    }

    #[test]
    fn test_option_subtree_excluded() {
        let html = "<html><body>\
            <select><option>Small</option><option>Large</option></select>\
            <div>Real content</div>\
            </body></html>";
        let output = rendered(html);
        assert!(!output.contains("Small"));
        assert!(!output.contains("Large"));
        assert!(output.contains("Real content"));
    }

    #[test]
    fn test_script_prose_literal_promoted() {
        let html = r#"<html><body><script>
            var banner = "Welcome to our store! Browse our new items today.";
        </script></body></html>"#;
        let output = rendered(html);
        assert!(output.contains("Welcome to our store! Browse our new items today."));
    }

    #[test]
    fn test_script_noise_literal_discarded() {
        let html = r#"<html><body><script>
            var token = "a1b2c3==xyz==999";
        </script></body></html>"#;
        let output = rendered(html);
        assert!(!output.contains("a1b2c3"));
    }

    #[test]
    fn test_script_code_not_leaked() {
        let html = r#"<html><body><script>
            function setup() { return document.getElementById("x"); }
        </script><p>Visible</p></body></html>"#;
        let output = rendered(html);
        assert!(!output.contains("function setup"));
        assert!(output.contains("Visible"));
    }

    #[test]
    fn test_script_embedded_html_recursed() {
        let html = r#"<html><body><script>
            var template = "<div><p>Embedded template content here</p></div>";
        </script></body></html>"#;
        let elements = walk(html);

        // The literal became a synthetic parent with markup children.
        let literal_index = elements
            .iter()
            .position(|e| e.name.as_deref() == Some(SCRIPT_STRING_NAME))
            .expect("literal element");
        assert!(elements[literal_index].text.is_empty());
        assert!(
            elements
                .iter()
                .any(|e| e.name.as_deref() == Some("p") && e.text.contains("Embedded template content here"))
        );

        let output = render_salient_text(&elements);
        assert!(output.contains("Embedded template content here"));
    }

    #[test]
    fn test_container_flattening_div_boundary() {
        let html = "<html><body><span>Hello<div>World</div></span></body></html>";
        let elements = walk(html);
        let span = elements.iter().find(|e| e.name.as_deref() == Some("span")).unwrap();
        assert_eq!(span.text, "Hello World");
        assert!(span.keep);
    }

    #[test]
    fn test_pre_preserves_indentation_and_block_break() {
        let html = "<html><body><pre>fn main() {\n    body\n}</pre><p>after</p></body></html>";
        let elements = walk(html);
        let pre = elements.iter().find(|e| e.name.as_deref() == Some("pre")).unwrap();
        assert!(pre.text.ends_with('\n'));
        assert!(pre.lines.iter().any(|l| l.text == "    body"));

        let output = rendered(html);
        assert!(output.contains("    body"));
        assert!(output.contains("after"));
    }

    #[test]
    fn test_word_count_conservation_across_walk() {
        let html = "<html><body><div>The quick brown fox</div><p>jumps over the lazy dog</p></body></html>";
        for element in walk(html) {
            let line_sum: usize = element.lines.iter().map(|l| l.word_count).sum();
            assert_eq!(element.word_count, line_sum);
        }
    }

    #[test]
    fn test_render_collapses_blank_runs() {
        let html = "<html><body>\
            <div>first</div>\
            <pre>\n\n\n</pre>\
            <div>second</div>\
            </body></html>";
        let output = rendered(html);
        assert!(!output.contains("\n\n\n"));
        assert!(output.contains("first"));
        assert!(output.contains("second"));
    }

    #[test]
    fn test_degrades_to_keep_everything_without_signals() {
        // No scripts, no options: nothing should be dropped.
        let html = "<html><body><div>alpha</div><div>beta</div><div>gamma</div></body></html>";
        let output = rendered(html);
        for word in ["alpha", "beta", "gamma"] {
            assert!(output.contains(word));
        }
    }
}
