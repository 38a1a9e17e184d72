//! Unicode category analysis.
//!
//! Classifies text by the distribution of its characters over seven coarse
//! Unicode general-category buckets, and scores how far that distribution
//! sits from typical English prose. The salience walker uses the distance as
//! a cheap "looks like natural language" signal for script string literals.

use unicode_general_category::{GeneralCategory, get_general_category};

/// Coarse Unicode category buckets, ordered most to least frequent in
/// natural-language text. The order is load-bearing: it fixes the layout of
/// [`CategoryCounts::ratios`] and the reference vector below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryBucket {
    Letter,
    Separator,
    Punctuation,
    Symbol,
    Number,
    Mark,
    Other,
}

/// All buckets in ratio-vector order.
pub const BUCKETS: [CategoryBucket; 7] = [
    CategoryBucket::Letter,
    CategoryBucket::Separator,
    CategoryBucket::Punctuation,
    CategoryBucket::Symbol,
    CategoryBucket::Number,
    CategoryBucket::Mark,
    CategoryBucket::Other,
];

/// Typical category proportions for English prose.
const STANDARD_RATIOS: [f64; 7] = [0.85, 0.12, 0.30, 0.0, 0.0, 0.0, 0.0];

/// Per-bucket character counts for a piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    counts: [usize; 7],
}

impl CategoryCounts {
    /// Count of a single bucket.
    pub fn get(&self, bucket: CategoryBucket) -> usize {
        self.counts[bucket as usize]
    }

    /// Total characters counted.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Accumulate another count set into this one.
    pub fn merge(&mut self, other: &CategoryCounts) {
        for i in 0..7 {
            self.counts[i] += other.counts[i];
        }
    }

    /// Ratio of each bucket to the total, in [`BUCKETS`] order.
    ///
    /// Returns all zeros for empty text.
    pub fn ratios(&self) -> [f64; 7] {
        let total = self.total();
        if total == 0 {
            return [0.0; 7];
        }
        let mut out = [0.0; 7];
        for i in 0..7 {
            out[i] = self.counts[i] as f64 / total as f64;
        }
        out
    }
}

/// Maps a character's fine-grained general category to its coarse bucket.
pub fn bucket_of(c: char) -> CategoryBucket {
    use GeneralCategory::*;
    match get_general_category(c) {
        UppercaseLetter | LowercaseLetter | TitlecaseLetter | ModifierLetter | OtherLetter => CategoryBucket::Letter,
        SpaceSeparator | LineSeparator | ParagraphSeparator => CategoryBucket::Separator,
        ConnectorPunctuation | DashPunctuation | OpenPunctuation | ClosePunctuation | InitialPunctuation
        | FinalPunctuation | OtherPunctuation => CategoryBucket::Punctuation,
        MathSymbol | CurrencySymbol | ModifierSymbol | OtherSymbol => CategoryBucket::Symbol,
        DecimalNumber | LetterNumber | OtherNumber => CategoryBucket::Number,
        NonspacingMark | SpacingMark | EnclosingMark => CategoryBucket::Mark,
        Control | Format | Surrogate | PrivateUse | Unassigned => CategoryBucket::Other,
        _ => CategoryBucket::Other,
    }
}

/// Counts the coarse category of every character in `text`.
pub fn count_categories(text: &str) -> CategoryCounts {
    let mut counts = CategoryCounts::default();
    for c in text.chars() {
        counts.counts[bucket_of(c) as usize] += 1;
    }
    counts
}

/// Euclidean distance between the text's category ratio vector and the
/// English-prose reference vector. Low distance means prose-like.
pub fn standard_distance(counts: &CategoryCounts) -> f64 {
    let ratios = counts.ratios();
    let mut sum = 0.0;
    for i in 0..7 {
        let d = ratios[i] - STANDARD_RATIOS[i];
        sum += d * d;
    }
    sum.sqrt()
}

/// True if the character is a Unicode letter or number.
pub fn is_alphanumeric(c: char) -> bool {
    matches!(bucket_of(c), CategoryBucket::Letter | CategoryBucket::Number)
}

/// Trims leading and trailing characters that are not Unicode letters or
/// numbers. This is category-aware, not an ASCII punctuation strip.
pub fn strip_non_alphanumeric_edges(text: &str) -> &str {
    text.trim_matches(|c| !is_alphanumeric(c))
}

/// Length in characters of the longest run of non-whitespace characters.
///
/// Used as a sanity ceiling when judging script strings: real prose does not
/// contain unbroken runs longer than the longest English word.
pub fn longest_run(text: &str) -> usize {
    text.split_whitespace().map(|tok| tok.chars().count()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_categories_prose() {
        let counts = count_categories("Hello, world!");
        assert_eq!(counts.get(CategoryBucket::Letter), 10);
        assert_eq!(counts.get(CategoryBucket::Separator), 1);
        assert_eq!(counts.get(CategoryBucket::Punctuation), 2);
        assert_eq!(counts.total(), 13);
    }

    #[test]
    fn test_count_categories_mixed() {
        let counts = count_categories("a1 $");
        assert_eq!(counts.get(CategoryBucket::Letter), 1);
        assert_eq!(counts.get(CategoryBucket::Number), 1);
        assert_eq!(counts.get(CategoryBucket::Separator), 1);
        assert_eq!(counts.get(CategoryBucket::Symbol), 1);
    }

    #[test]
    fn test_ratios_sum_to_one() {
        let counts = count_categories("The quick brown fox jumps over the lazy dog.");
        let sum: f64 = counts.ratios().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ratios_empty_text() {
        let counts = count_categories("");
        assert_eq!(counts.ratios(), [0.0; 7]);
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_standard_distance_prose_is_low() {
        let prose = count_categories("Welcome to our store! Browse our new items today.");
        let noise = count_categories("a1b2c3==xyz==999");
        assert!(standard_distance(&prose) < 0.4);
        assert!(standard_distance(&noise) > 0.4);
    }

    #[test]
    fn test_standard_distance_empty() {
        // All-zero ratio vector: distance is the norm of the reference.
        let d = standard_distance(&CategoryCounts::default());
        let expected = (0.85f64 * 0.85 + 0.12 * 0.12 + 0.30 * 0.30).sqrt();
        assert!((d - expected).abs() < 1e-9);
    }

    #[test]
    fn test_strip_edges_ascii() {
        assert_eq!(strip_non_alphanumeric_edges("\"hello!\""), "hello");
        assert_eq!(strip_non_alphanumeric_edges("(42)"), "42");
        assert_eq!(strip_non_alphanumeric_edges("clean"), "clean");
    }

    #[test]
    fn test_strip_edges_unicode() {
        // Curly quotes are Punctuation, Initial/Final Quote.
        assert_eq!(strip_non_alphanumeric_edges("\u{201C}quoted\u{201D}"), "quoted");
        assert_eq!(strip_non_alphanumeric_edges("\u{2014}dash\u{2014}"), "dash");
    }

    #[test]
    fn test_strip_edges_keeps_interior() {
        assert_eq!(strip_non_alphanumeric_edges("--a,b--"), "a,b");
        assert_eq!(strip_non_alphanumeric_edges("!!!"), "");
    }

    #[test]
    fn test_longest_run() {
        assert_eq!(longest_run("a bb ccc"), 3);
        assert_eq!(longest_run(""), 0);
        assert_eq!(longest_run("   "), 0);
        assert_eq!(longest_run("pneumonoultramicroscopicsilicovolcanoconiosis"), 45);
    }
}
