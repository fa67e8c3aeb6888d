//! Post storage with stable, never-reused ids.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MurmurError, Result};
use crate::lexical::index::TextSource;

/// Identifier of a post. Assigned by [`PostStore::create`].
pub type PostId = u64;

/// A single immutable post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    id: PostId,
    author: String,
    content: String,
}

impl Post {
    pub fn id(&self) -> PostId {
        self.id
    }

    /// Handle of the user who wrote this post.
    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Post {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}: {}", self.author, self.content)
    }
}

/// Registry of live posts.
///
/// Ids grow strictly; a deleted id is never handed out again, so a stale id
/// held by a caller can only ever resolve to "not found".
#[derive(Debug, Default)]
pub struct PostStore {
    posts: BTreeMap<PostId, Post>,
    next_id: PostId,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new post and return it.
    ///
    /// The author handle is not checked here; the caller validates it.
    pub fn create(&mut self, author: impl Into<String>, content: impl Into<String>) -> Post {
        let id = self.next_id;
        self.next_id += 1;

        let post = Post {
            id,
            author: author.into(),
            content: content.into(),
        };
        self.posts.insert(id, post.clone());
        post
    }

    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.posts.get(&id)
    }

    pub fn contains(&self, id: PostId) -> bool {
        self.posts.contains_key(&id)
    }

    /// Remove a post, returning it for cascading cleanup.
    pub fn delete(&mut self, id: PostId) -> Result<Post> {
        self.posts
            .remove(&id)
            .ok_or_else(|| MurmurError::not_found(format!("post {id}")))
    }

    /// The id the next call to [`create`](Self::create) will assign.
    pub fn peek_next_id(&self) -> PostId {
        self.next_id
    }

    /// Live posts in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Post> {
        self.posts.values()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

impl TextSource for PostStore {
    fn text(&self, id: PostId) -> Option<&str> {
        self.posts.get(&id).map(Post::content)
    }
}
