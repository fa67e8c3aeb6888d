//! Text analysis for Murmur.
//!
//! Post content, user names and search queries all pass through the same
//! tokenizer, so a word indexed from a post is always spelled the same way
//! as the word typed into a query.
//!
//! ```text
//! Text → NFKC (optional) → lowercase → Unicode word segmentation → Tokens
//! ```
//!
//! # Examples
//!
//! ```
//! use murmur::analysis::{Tokenizer, UnicodeWordTokenizer};
//!
//! let tokenizer = UnicodeWordTokenizer::new();
//! assert_eq!(tokenizer.tokenize("Hello, World!"), vec!["hello", "world"]);
//! ```

pub mod tokenizer;

pub use tokenizer::{Tokenizer, UnicodeWordTokenizer};
