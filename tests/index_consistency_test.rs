use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use murmur::{GraphStore, PostId, Tokenizer, UnicodeWordTokenizer};

const WORDS: &[&str] = &["cat", "dog", "Bird", "fish", "cat!", "I'm", "owl"];
const AUTHORS: &[&str] = &["ann", "ben", "cy"];

/// Check that every live post is filed under exactly its own tokens,
/// once per occurrence, and that no deleted post is referenced anywhere.
fn assert_consistent(store: &GraphStore, live: &BTreeSet<PostId>, deleted: &BTreeSet<PostId>) {
    let tokenizer = UnicodeWordTokenizer::new();
    let mut vocabulary = BTreeSet::new();

    for &id in live {
        let post = store.get_post(id).expect("live post must exist");
        let tokens = tokenizer.tokenize(post.content());
        for token in &tokens {
            let expected = tokens.iter().filter(|t| *t == token).count();
            let actual = store
                .indexed_posts(token)
                .iter()
                .filter(|&&p| p == id)
                .count();
            assert_eq!(actual, expected, "post {id} under {token:?}");
        }
        vocabulary.extend(tokens);

        let owner = store.user_by_handle(post.author()).expect("author must exist");
        assert!(owner.post_ids().contains(&id));
    }

    for token in &vocabulary {
        for id in store.indexed_posts(token) {
            assert!(live.contains(&id), "dangling post {id} under {token:?}");
        }
    }
    for &id in deleted {
        assert!(!store.is_indexed(id), "deleted post {id} still indexed");
    }
    assert_eq!(store.stats().posts, live.len());
    assert_eq!(store.stats().terms, vocabulary.len());
}

#[test]
fn test_random_add_delete_sequences_keep_index_consistent() -> murmur::Result<()> {
    let mut rng = StdRng::seed_from_u64(7);
    let store = GraphStore::new();
    store.add_users(AUTHORS.iter().map(|h| (*h, *h)))?;

    let mut live = BTreeSet::new();
    let mut deleted = BTreeSet::new();

    for _ in 0..300 {
        if live.is_empty() || rng.random_bool(0.6) {
            let len = rng.random_range(1..6);
            let content: Vec<&str> = (0..len)
                .filter_map(|_| WORDS.choose(&mut rng).copied())
                .collect();
            let author = AUTHORS.choose(&mut rng).copied().unwrap_or("ann");
            let post = store.add_post(author, &content.join(" "))?;
            live.insert(post.id());
        } else {
            let ids: Vec<PostId> = live.iter().copied().collect();
            let id = ids[rng.random_range(0..ids.len())];
            store.delete_post(id)?;
            live.remove(&id);
            deleted.insert(id);
        }
        assert_consistent(&store, &live, &deleted);
    }

    Ok(())
}

#[test]
fn test_tokenization_is_idempotent() {
    let tokenizer = UnicodeWordTokenizer::new();
    for text in ["cat dog cat", "I'm HERE, aren't I?", "", "ＣＡＴ ﬁsh"] {
        assert_eq!(tokenizer.tokenize(text), tokenizer.tokenize(text));
    }
}
