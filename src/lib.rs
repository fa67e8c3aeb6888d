//! # Murmur
//!
//! An in-memory social graph store with integrated keyword search.
//!
//! ## Features
//!
//! - Users keyed by case-insensitive handle, with symmetric follow edges
//! - Posts with stable, never-reused ids
//! - Inverted index kept consistent with every insert and delete
//! - Term-overlap ranking for posts and user names
//! - Cascading deletes that leave no dangling ids or edges
//! - A single reader/writer lock making every compound operation atomic

pub mod analysis;
mod engine;
mod error;
pub mod lexical;
pub mod store;

// Re-exports for the public API
pub use analysis::{Tokenizer, UnicodeWordTokenizer};
pub use engine::config::{GraphConfig, GraphConfigBuilder, TokenizerConfig};
pub use engine::search::{SearchHit, SearchRequest, SearchRequestBuilder};
pub use engine::{GraphStats, GraphStore};
pub use error::{MurmurError, Result};
pub use lexical::{InvertedIndex, ScoredHit};
pub use store::{Post, PostId, PostStore, User, UserDirectory};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
