//! Term-overlap scoring.
//!
//! A candidate's score is the number of its own tokens, repeats included,
//! that appear among the query keywords. `"cat dog cat"` scores 3 against
//! the query `"cat dog"`.

use std::cmp::Reverse;

use ahash::AHashSet;

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredHit<K> {
    pub key: K,
    pub score: usize,
    /// Creation ordinal of the candidate; lower ranks first on equal scores.
    pub ordinal: u64,
}

/// Count the tokens of a candidate that are query keywords.
pub fn overlap_score<S: AsRef<str>>(tokens: &[S], keywords: &AHashSet<String>) -> usize {
    tokens
        .iter()
        .filter(|token| {
            let token: &str = token.as_ref();
            keywords.contains(token)
        })
        .count()
}

/// Sort hits by descending score then ascending ordinal, and keep the first `top_k`.
///
/// Zero-score hits are dropped.
pub fn rank<K>(mut hits: Vec<ScoredHit<K>>, top_k: Option<usize>) -> Vec<ScoredHit<K>> {
    hits.retain(|hit| hit.score > 0);
    hits.sort_by_key(|hit| (Reverse(hit.score), hit.ordinal));
    if let Some(k) = top_k {
        hits.truncate(k);
    }
    hits
}
