//! Tokenizers that turn free text into lowercase word tokens.

use std::fmt::Debug;

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::engine::config::TokenizerConfig;

/// Splits text into an ordered sequence of normalized tokens.
///
/// Implementations must be pure: the same input always yields the same
/// tokens in the same order. The inverted index relies on this to find
/// every bucket a post was filed under when the post is removed.
pub trait Tokenizer: Send + Sync + Debug {
    /// Tokenize `text`, preserving order and repeats.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Name of this tokenizer.
    fn name(&self) -> &'static str;
}

/// Case-folding tokenizer based on UAX #29 word boundaries.
///
/// Punctuation and whitespace segments are dropped. Contractions stay whole,
/// so `"I'm"` becomes the single token `"i'm"`.
#[derive(Debug, Clone)]
pub struct UnicodeWordTokenizer {
    unicode_normalization: bool,
}

impl UnicodeWordTokenizer {
    /// Create a tokenizer with NFKC normalization enabled.
    pub fn new() -> Self {
        Self {
            unicode_normalization: true,
        }
    }

    /// Create a tokenizer from configuration.
    pub fn from_config(config: &TokenizerConfig) -> Self {
        Self {
            unicode_normalization: config.unicode_normalization,
        }
    }

    /// Case-fold a single string the same way tokens are folded.
    ///
    /// Used for handle and name comparisons, which are matched whole rather
    /// than split into words.
    pub fn fold(&self, text: &str) -> String {
        if self.unicode_normalization {
            text.nfkc().collect::<String>().to_lowercase()
        } else {
            text.to_lowercase()
        }
    }
}

impl Default for UnicodeWordTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.fold(text)
            .unicode_words()
            .map(str::to_string)
            .collect()
    }

    fn name(&self) -> &'static str {
        "unicode_word"
    }
}
