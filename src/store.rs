//! Entity stores owned by the graph store.
//!
//! - `user`: user registry keyed by case-insensitive handle, with follow edges
//! - `post`: post registry keyed by monotonically increasing id

pub mod post;
pub mod user;

pub use post::{Post, PostId, PostStore};
pub use user::{User, UserDirectory};
