//! In-memory inverted index over post content.
//!
//! Each token maps to a bucket of post ids in insertion order. A post that
//! contains a token several times appears in that bucket several times.

use std::collections::BTreeSet;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use log::trace;

use crate::analysis::Tokenizer;
use crate::lexical::scoring::{ScoredHit, overlap_score, rank};
use crate::store::post::{Post, PostId};

/// Read access to the text of indexed posts.
///
/// Search re-tokenizes each candidate's content to score it, so the index
/// needs a way to look the content up by id.
pub trait TextSource {
    fn text(&self, id: PostId) -> Option<&str>;
}

/// Token → post-id postings.
#[derive(Debug)]
pub struct InvertedIndex {
    tokenizer: Arc<dyn Tokenizer>,
    postings: AHashMap<String, Vec<PostId>>,
}

impl InvertedIndex {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self {
            tokenizer,
            postings: AHashMap::new(),
        }
    }

    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    /// Add every token occurrence of `post` to its bucket.
    ///
    /// Must be called once per live post. Indexing the same post twice
    /// without removing it in between doubles its postings.
    pub fn index_post(&mut self, post: &Post) {
        for token in self.tokenizer.tokenize(post.content()) {
            self.postings.entry(token).or_default().push(post.id());
        }
    }

    /// Drop every occurrence of `post` from the index.
    ///
    /// Returns the number of postings removed; zero if the post was never indexed.
    pub fn remove_post(&mut self, post: &Post) -> usize {
        let id = post.id();
        let tokens: AHashSet<String> = self.tokenizer.tokenize(post.content()).into_iter().collect();

        let mut removed = 0;
        for token in tokens {
            if let Some(bucket) = self.postings.get_mut(&token) {
                let before = bucket.len();
                bucket.retain(|&p| p != id);
                removed += before - bucket.len();
                if bucket.is_empty() {
                    self.postings.remove(&token);
                }
            }
        }
        removed
    }

    /// Rank posts against `query` by term overlap.
    ///
    /// Candidates are the posts filed under at least one query keyword. Each
    /// candidate's content is re-tokenized and scored with [`overlap_score`].
    /// Ties go to the older post. An empty query yields no hits.
    pub fn search<S: TextSource>(
        &self,
        query: &str,
        top_k: Option<usize>,
        source: &S,
    ) -> Vec<ScoredHit<PostId>> {
        let keywords: AHashSet<String> = self.tokenizer.tokenize(query).into_iter().collect();
        if keywords.is_empty() {
            return Vec::new();
        }

        let candidates: BTreeSet<PostId> = keywords
            .iter()
            .filter_map(|keyword| self.postings.get(keyword))
            .flatten()
            .copied()
            .collect();

        trace!(
            "query {:?}: {} keywords, {} candidates",
            query,
            keywords.len(),
            candidates.len()
        );

        let hits = candidates
            .into_iter()
            .filter_map(|id| {
                let text = source.text(id)?;
                let tokens = self.tokenizer.tokenize(text);
                Some(ScoredHit {
                    key: id,
                    score: overlap_score(&tokens, &keywords),
                    ordinal: id,
                })
            })
            .collect();

        rank(hits, top_k)
    }

    /// Post ids filed under `token`, with repeats, in insertion order.
    pub fn postings(&self, token: &str) -> &[PostId] {
        self.postings.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, token: &str, id: PostId) -> bool {
        self.postings(token).contains(&id)
    }

    /// Whether `id` appears under any token.
    pub fn references(&self, id: PostId) -> bool {
        self.postings.values().any(|bucket| bucket.contains(&id))
    }

    /// Number of distinct tokens.
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}
