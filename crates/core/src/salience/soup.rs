//! Walker output types: elements, lines, tokens.
//!
//! A [`SoupElement`] is one node the walker emitted, broken into
//! [`SoupLine`]s with per-line analysis. The keep flags decide what the
//! downstream renderer includes; everything else (category distributions,
//! distances, word counts) is carried for diagnostics and sorting.

use serde::{Deserialize, Serialize};

use crate::lexicon::{Lexicon, WordCategory};
use crate::sniff::sniff_text_label;
use crate::unicode::{CategoryCounts, count_categories, longest_run, standard_distance};

/// Synthetic tag name for a string literal lifted out of a script body.
pub const SCRIPT_STRING_NAME: &str = "script.String";

/// Display sentinel for nodes with no tag (text leaves).
pub const NO_TAG: &str = "<!none!>";

/// Tags whose text is flattened and always kept.
pub const CONTAINER_TAGS: [&str; 6] = ["pre", "code", "span", "br", "hr", "p"];

/// Tag whose subtree is selection-list noise, never page content.
pub const EXCLUDE_TAG: &str = "option";

/// Tunable thresholds for promoting script string literals to kept text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalienceConfig {
    /// Ceiling on the longest unbroken character run; longer runs are
    /// minified code or data, not prose. The default is the length of the
    /// longest common English word,
    /// "pneumonoultramicroscopicsilicovolcanoconiosis".
    pub max_word_run: usize,
    /// A promoted line needs strictly more than this many word tokens.
    pub min_word_count: usize,
    /// Upper bound on the Unicode-category distance from English prose.
    pub max_standard_distance: f64,
    /// A promoted line needs a word-to-token ratio above this.
    pub min_word_ratio: f64,
}

impl Default for SalienceConfig {
    fn default() -> Self {
        Self {
            max_word_run: 45,
            min_word_count: 2,
            max_standard_distance: 0.4,
            min_word_ratio: 0.5,
        }
    }
}

/// True if `name` is one of the always-keep container tags.
pub fn is_container_tag(name: Option<&str>) -> bool {
    matches!(name, Some(n) if CONTAINER_TAGS.contains(&n))
}

/// One whitespace-delimited token from a line, with its word category.
#[derive(Debug, Clone)]
pub struct SoupToken {
    pub text: String,
    pub word_category: Option<WordCategory>,
}

impl SoupToken {
    pub fn new(lexicon: &Lexicon, text: &str) -> Self {
        Self { text: text.to_string(), word_category: lexicon.categorize_token(text) }
    }

    /// Any recognized category counts as a word token.
    pub fn is_word(&self) -> bool {
        self.word_category.is_some()
    }
}

/// One line of text belonging to a [`SoupElement`].
#[derive(Debug, Clone)]
pub struct SoupLine {
    pub text: String,
    pub keep: bool,
    pub category_counts: CategoryCounts,
    pub standard_dist: Option<f64>,
    pub tokens: Vec<SoupToken>,
    pub word_count: usize,
    pub longest_run: usize,
}

impl SoupLine {
    /// Analyzes one line.
    ///
    /// `preserve_whitespace` is set for lines inside container tags, where
    /// leading/trailing whitespace is content. `excluded` forces the line
    /// out (option subtrees).
    pub fn new(
        lexicon: &Lexicon,
        config: &SalienceConfig,
        name: Option<&str>,
        text: &str,
        preserve_whitespace: bool,
        excluded: bool,
    ) -> Self {
        let is_script_string = name == Some(SCRIPT_STRING_NAME);

        // Script literals must earn their keep; everything else defaults in.
        let keep = !is_script_string && !excluded;

        let text = if preserve_whitespace { text.to_string() } else { text.trim().to_string() };

        let mut line = Self {
            text,
            keep,
            category_counts: CategoryCounts::default(),
            standard_dist: None,
            tokens: Vec::new(),
            word_count: 0,
            longest_run: 0,
        };

        if line.text.trim().is_empty() {
            // Blank line; nothing to analyze.
            return line;
        }

        line.longest_run = longest_run(&line.text);
        line.category_counts = count_categories(&line.text);
        let dist = standard_distance(&line.category_counts);
        line.standard_dist = Some(dist);

        for token in line.text.split_whitespace() {
            let token = SoupToken::new(lexicon, token);
            line.word_count += usize::from(token.is_word());
            line.tokens.push(token);
        }

        if is_script_string && !excluded {
            line.keep = line.longest_run <= config.max_word_run
                && line.word_count > config.min_word_count
                && dist < config.max_standard_distance
                && line.word_pct() > config.min_word_ratio;
        }

        line
    }

    /// Fraction of tokens that are recognized words.
    pub fn word_pct(&self) -> f64 {
        if self.tokens.is_empty() {
            return 0.0;
        }
        self.word_count as f64 / self.tokens.len() as f64
    }
}

/// One node emitted by the salience walk.
#[derive(Debug, Clone)]
pub struct SoupElement {
    /// Nesting depth in the walked tree.
    pub depth: usize,
    /// Arena index of the parent element, if any. Immutable after
    /// construction; the walk never reparents.
    pub parent: Option<usize>,
    /// Tag name of the parent element.
    pub parent_name: Option<String>,
    /// Tag name, or `None` for text leaves (displayed as [`NO_TAG`]).
    pub name: Option<String>,
    /// Raw text carried by this node.
    pub text: String,
    /// True when at least one line keeps, or unconditionally for
    /// container tags.
    pub keep: bool,
    pub lines: Vec<SoupLine>,
    pub word_count: usize,
    pub token_count: usize,
    pub category_counts: CategoryCounts,
    pub min_standard_dist: Option<f64>,
    pub max_standard_dist: Option<f64>,
    pub max_longest_run: usize,
    /// Coarse sniffed label for the raw text; diagnostic only.
    pub text_label: &'static str,
}

impl SoupElement {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        lexicon: &Lexicon,
        config: &SalienceConfig,
        depth: usize,
        parent: Option<usize>,
        parent_name: Option<String>,
        name: Option<String>,
        text: String,
        excluded: bool,
    ) -> Self {
        let container = is_container_tag(name.as_deref());
        let preserve_whitespace = container || is_container_tag(parent_name.as_deref());

        let mut element = Self {
            depth,
            parent,
            parent_name,
            name,
            text_label: sniff_text_label(&text),
            text,
            keep: container,
            lines: Vec::new(),
            word_count: 0,
            token_count: 0,
            category_counts: CategoryCounts::default(),
            min_standard_dist: None,
            max_standard_dist: None,
            max_longest_run: 0,
        };

        let text = element.text.clone();
        for raw_line in text.lines() {
            let line = SoupLine::new(
                lexicon,
                config,
                element.name.as_deref(),
                raw_line,
                preserve_whitespace,
                excluded,
            );

            element.word_count += line.word_count;
            element.token_count += line.tokens.len();
            element.category_counts.merge(&line.category_counts);
            element.max_longest_run = element.max_longest_run.max(line.longest_run);

            if let Some(dist) = line.standard_dist {
                element.min_standard_dist = Some(match element.min_standard_dist {
                    Some(current) => current.min(dist),
                    None => dist,
                });
                element.max_standard_dist = Some(match element.max_standard_dist {
                    Some(current) => current.max(dist),
                    None => dist,
                });
            }

            if line.keep {
                element.keep = true;
            }
            element.lines.push(line);
        }

        element
    }

    /// Display name: the tag, or the no-tag sentinel for text leaves.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(NO_TAG)
    }

    /// Fraction of tokens across all lines that are recognized words.
    pub fn word_pct(&self) -> f64 {
        if self.token_count == 0 {
            return 0.0;
        }
        self.word_count as f64 / self.token_count as f64
    }
}
