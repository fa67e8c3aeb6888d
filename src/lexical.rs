//! Keyword search over post content.
//!
//! # Module Structure
//!
//! - `index`: token → post-id postings with incremental add/remove
//! - `scoring`: term-overlap scoring and top-k ranking shared by post and user search

pub mod index;
pub mod scoring;

pub use index::{InvertedIndex, TextSource};
pub use scoring::{ScoredHit, overlap_score, rank};
