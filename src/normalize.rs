//! Text normalization shared by both pipelines.
//!
//! Raw messages are split on Unicode word boundaries (UAX #29), stopwords
//! are dropped by their lower-cased form, survivors are reduced to their
//! noun base form, and the result is rejoined with single spaces. Training
//! and inference both go through [`TextNormalizer::normalize`]; there is no
//! second normalization code path, so the classifier sees byte-identical
//! preprocessing on both sides.

use std::collections::HashSet;
use std::sync::LazyLock;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;
use crate::lemma;

/// Default English stop words list.
///
/// High-frequency function words excluded from feature extraction, matched
/// against the lower-cased token form.
const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

static ENGLISH_STOP_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| DEFAULT_ENGLISH_STOP_WORDS.iter().copied().collect());

/// Normalizes raw text into a whitespace-joined sequence of lemmas.
///
/// # Examples
///
/// ```
/// use msg2user::normalize::TextNormalizer;
///
/// let normalizer = TextNormalizer::new();
/// let doc = normalizer.normalize("The cats are sleeping!").unwrap();
/// assert_eq!(doc, "cat sleeping");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    /// Create a new normalizer.
    pub fn new() -> Self {
        TextNormalizer
    }

    /// Tokenize, remove stopwords, lemmatize, and rejoin.
    ///
    /// Empty or whitespace-only input normalizes to an empty string.
    pub fn normalize(&self, raw: &str) -> Result<String> {
        let lemmas: Vec<String> = raw
            .split_word_bounds()
            // Keep actual words; punctuation-only and whitespace segments
            // carry no countable content.
            .filter(|segment| segment.chars().any(char::is_alphanumeric))
            .filter(|token| !ENGLISH_STOP_WORDS.contains(token.to_lowercase().as_str()))
            .map(lemma::lemmatize)
            .collect();

        Ok(lemmas.join(" "))
    }
}
