//! Lexical token classification.
//!
//! Decides whether a whitespace-delimited token is a real word (dictionary
//! entry or an inflected form of one), a URL, or an email address, and
//! whether a larger string looks like embedded HTML. The salience walker
//! leans on these to separate prose from identifiers and markup noise.

use std::collections::HashSet;
use std::io::{self, BufRead};

use regex::Regex;
use url::Url;

use crate::unicode::strip_non_alphanumeric_edges;

const BUNDLED_WORDS: &str = include_str!("../assets/words.txt");

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$";

// Rough open/close tag shapes; this is a balance heuristic, not a parser.
const START_TAG_PATTERN: &str = r"<([a-zA-Z]+[1-6]?)";
const END_TAG_PATTERN: &str = r"</([a-zA-Z]+[1-6]?)>";

/// The category assigned to a token that counts as a word-like unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCategory {
    /// Lowercase form found directly in the word list.
    Dictionary,
    /// An inflected form whose stem is in the word list.
    KnownLemma,
    /// A single token parseable as a URL with scheme and host.
    UrlLike,
    /// A single token matching a conservative email shape.
    EmailLike,
}

/// A natural-language word list with inflection-aware membership tests.
///
/// The default instance uses a bundled English frequency list; callers with
/// a system dictionary can load it via [`Lexicon::from_reader`].
#[derive(Debug, Clone)]
pub struct Lexicon {
    words: HashSet<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::bundled()
    }
}

impl Lexicon {
    /// Builds the lexicon from the bundled word list.
    pub fn bundled() -> Self {
        let words = BUNDLED_WORDS
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|line| !line.is_empty())
            .collect();
        Self { words }
    }

    /// Builds a lexicon from a newline-separated word list.
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut words = HashSet::new();
        for line in reader.lines() {
            let line = line?;
            let word = line.trim().to_lowercase();
            if !word.is_empty() {
                words.insert(word);
            }
        }
        Ok(Self { words })
    }

    /// Number of entries in the word list.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Direct lowercase membership test.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// Membership test for inflected forms: plural, past, progressive,
    /// comparative, superlative, and adverbial suffixes reduced to a stem
    /// that must itself be in the word list.
    pub fn contains_lemma(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        let candidates = lemma_stems(&lower);
        candidates.iter().any(|stem| self.words.contains(stem))
    }

    /// Categorizes one whitespace-delimited token.
    ///
    /// Priority order: numeric literals are never words; then dictionary
    /// membership, lemma membership, URL-likeness, email-likeness.
    pub fn categorize_token(&self, token: &str) -> Option<WordCategory> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        // Numbers split out of prose are not words.
        if token.parse::<f64>().is_ok() {
            return None;
        }

        if self.contains(token) {
            Some(WordCategory::Dictionary)
        } else if self.contains_lemma(token) {
            Some(WordCategory::KnownLemma)
        } else if like_url(token) {
            Some(WordCategory::UrlLike)
        } else if like_email(token) {
            Some(WordCategory::EmailLike)
        } else {
            None
        }
    }

    /// True if the token is a dictionary word or a known inflected form.
    pub fn is_word(&self, token: &str) -> bool {
        matches!(
            self.categorize_token(token),
            Some(WordCategory::Dictionary) | Some(WordCategory::KnownLemma)
        )
    }
}

/// Candidate stems for an inflected lowercase word.
fn lemma_stems(word: &str) -> Vec<String> {
    let mut stems = Vec::new();
    let n = word.len();

    if n > 4 && word.ends_with("ies") {
        stems.push(format!("{}y", &word[..n - 3]));
    }
    if n > 3 && word.ends_with("es") {
        stems.push(word[..n - 2].to_string());
    }
    if n > 2 && word.ends_with('s') && !word.ends_with("ss") {
        stems.push(word[..n - 1].to_string());
    }
    if n > 3 && word.ends_with("ed") {
        push_with_undoubling(&mut stems, &word[..n - 2]);
    }
    if n > 4 && word.ends_with("ing") {
        push_with_undoubling(&mut stems, &word[..n - 3]);
    }
    if n > 3 && word.ends_with("er") {
        stems.push(word[..n - 2].to_string());
        stems.push(format!("{}e", &word[..n - 2]));
    }
    if n > 4 && word.ends_with("est") {
        stems.push(word[..n - 3].to_string());
        stems.push(format!("{}e", &word[..n - 3]));
    }
    if n > 3 && word.ends_with("ly") {
        stems.push(word[..n - 2].to_string());
    }

    stems
}

/// Pushes a stripped stem plus its `-e` restoration ("loved" -> "love") and
/// consonant-undoubled form ("running" -> "run").
fn push_with_undoubling(stems: &mut Vec<String>, stem: &str) {
    stems.push(stem.to_string());
    stems.push(format!("{}e", stem));

    let chars: Vec<char> = stem.chars().collect();
    if chars.len() > 2 && chars[chars.len() - 1] == chars[chars.len() - 2] {
        stems.push(chars[..chars.len() - 1].iter().collect());
    }
}

/// True if the token, after Unicode edge trimming, is a single
/// whitespace-free string parseable as a URL with scheme and host.
pub fn like_url(token: &str) -> bool {
    let trimmed = strip_non_alphanumeric_edges(token);
    if trimmed.split_whitespace().count() != 1 {
        return false;
    }
    match Url::parse(trimmed) {
        Ok(url) => !url.scheme().is_empty() && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// True if the token, after Unicode edge trimming, matches a conservative
/// email shape (local part, `@`, dotted domain).
pub fn like_email(token: &str) -> bool {
    let trimmed = strip_non_alphanumeric_edges(token);
    let email_regex = Regex::new(EMAIL_PATTERN).unwrap();
    email_regex.is_match(trimmed)
}

/// Heuristic tag-balance check: does `text` look like an HTML fragment?
///
/// Open and close tags are collected by regex scan (not parsing), then
/// reconciled with a stack. HTML-like means at least two tags were found
/// and fewer than 5% of them failed to reconcile. Strings with zero or one
/// tag are never HTML-like.
pub fn looks_like_html(text: &str) -> bool {
    let start_regex = Regex::new(START_TAG_PATTERN).unwrap();
    let end_regex = Regex::new(END_TAG_PATTERN).unwrap();

    let mut tags: Vec<(usize, bool, String)> = Vec::new();
    for m in start_regex.captures_iter(text) {
        let whole = m.get(0).unwrap();
        tags.push((whole.start(), true, m[1].to_lowercase()));
    }
    for m in end_regex.captures_iter(text) {
        let whole = m.get(0).unwrap();
        tags.push((whole.start(), false, m[1].to_lowercase()));
    }

    if tags.len() < 2 {
        return false;
    }
    tags.sort_by_key(|(pos, _, _)| *pos);

    let total = tags.len();
    let mut stack: Vec<String> = Vec::new();
    let mut unmatched = 0usize;

    for (_, is_open, name) in tags {
        if is_open {
            stack.push(name);
            continue;
        }
        match stack.pop() {
            // Close tag with nothing open counts as unmatched.
            None => unmatched += 1,
            Some(mut last) => {
                while last != name && !stack.is_empty() {
                    unmatched += 1;
                    last = stack.pop().unwrap();
                }
            }
        }
    }

    (unmatched as f64 / total as f64) < 0.05
}
