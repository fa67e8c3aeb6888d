pub mod config;
pub mod search;

use std::sync::Arc;

use ahash::AHashSet;
use log::{debug, trace};
use parking_lot::RwLock;

use crate::analysis::{Tokenizer, UnicodeWordTokenizer};
use crate::error::{MurmurError, Result};
use crate::lexical::index::InvertedIndex;
use crate::lexical::scoring::{ScoredHit, overlap_score, rank};
use crate::store::post::{Post, PostId, PostStore};
use crate::store::user::{User, UserDirectory, normalize_handle, validate_name};

use self::config::GraphConfig;
use self::search::{SearchHit, SearchRequest};

/// Everything guarded by the store lock.
#[derive(Debug)]
struct GraphState {
    users: UserDirectory,
    posts: PostStore,
    index: InvertedIndex,
}

/// Counts describing the current contents of a [`GraphStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphStats {
    pub users: usize,
    pub posts: usize,
    /// Distinct tokens in the post index.
    pub terms: usize,
}

/// In-memory social graph with keyword search.
///
/// The store coordinates the user directory, the post store and the
/// inverted index so that every mutation leaves the three consistent:
///
/// - a post is indexed exactly while it is live,
/// - a user's post ids match the posts that name them as author,
/// - follow edges are recorded on both ends.
///
/// All state sits behind a single [`RwLock`]. Mutations hold the write lock
/// for their whole duration and validate every precondition before the
/// first change, so a failed call leaves nothing behind. Queries share the
/// read lock and return owned snapshots.
///
/// # Example
///
/// ```
/// use murmur::GraphStore;
///
/// let store = GraphStore::new();
/// store.add_user("alice", Some("Alice")).unwrap();
/// store.add_post("alice", "cats and dogs").unwrap();
///
/// let hits = store.search("cats", None);
/// assert_eq!(hits.len(), 1);
/// ```
#[derive(Debug)]
pub struct GraphStore {
    config: GraphConfig,
    tokenizer: Arc<UnicodeWordTokenizer>,
    state: RwLock<GraphState>,
}

impl GraphStore {
    /// Create an empty store with the default configuration.
    pub fn new() -> Self {
        Self::build(GraphConfig::default())
    }

    /// Create an empty store with the given configuration.
    pub fn with_config(config: GraphConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: GraphConfig) -> Self {
        let tokenizer = Arc::new(UnicodeWordTokenizer::from_config(&config.tokenizer));
        let index = InvertedIndex::new(tokenizer.clone());
        Self {
            config,
            tokenizer,
            state: RwLock::new(GraphState {
                users: UserDirectory::new(),
                posts: PostStore::new(),
                index,
            }),
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    // ── users ───────────────────────────────────────────────────────

    /// Register a user, or return the existing user with that handle.
    ///
    /// A name is required only when the handle is new.
    pub fn add_user(&self, handle: &str, name: Option<&str>) -> Result<User> {
        self.register(handle, name, false)
    }

    /// Register an administrator. An existing handle is returned unchanged.
    pub fn add_admin(&self, handle: &str, name: &str) -> Result<User> {
        self.register(handle, Some(name), true)
    }

    fn register(&self, handle: &str, name: Option<&str>, admin: bool) -> Result<User> {
        let mut state = self.state.write();
        let before = state.users.len();
        let user = state.users.add(handle, name, admin)?.clone();
        if state.users.len() > before {
            debug!("registered user @{} (admin: {})", user.handle(), admin);
        }
        Ok(user)
    }

    /// Register many users at once.
    ///
    /// The whole batch is validated first; if any entry is invalid nothing
    /// is registered.
    pub fn add_users<'a, I>(&self, users: I) -> Result<Vec<User>>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let users: Vec<(&str, &str)> = users.into_iter().collect();
        let mut state = self.state.write();

        let mut pending = AHashSet::new();
        for (handle, name) in &users {
            let key = normalize_handle(handle)?;
            if !state.users.contains(&key) && !pending.contains(&key) {
                validate_name(&key, Some(name))?;
                pending.insert(key);
            }
        }

        let mut added = Vec::with_capacity(users.len());
        for (handle, name) in users {
            added.push(state.users.add(handle, Some(name), false)?.clone());
        }
        debug!("registered {} new users in batch", pending.len());
        Ok(added)
    }

    /// Delete a user together with all of their posts and follow edges.
    ///
    /// Returns the removed user.
    pub fn delete_user(&self, handle: &str) -> Result<User> {
        let mut state = self.state.write();
        let state = &mut *state;

        let user = state.users.remove(handle)?;
        for &id in user.post_ids() {
            if let Ok(post) = state.posts.delete(id) {
                state.index.remove_post(&post);
            }
        }

        debug!(
            "deleted user @{} with {} posts",
            user.handle(),
            user.post_ids().len()
        );
        Ok(user)
    }

    pub fn user_by_handle(&self, handle: &str) -> Option<User> {
        self.state.read().users.by_handle(handle).cloned()
    }

    pub fn user_by_name(&self, name: &str) -> Option<User> {
        self.state.read().users.by_name(name).cloned()
    }

    /// Look a user up by handle, falling back to an exact name match.
    pub fn find_user(&self, query: &str) -> Option<User> {
        let state = self.state.read();
        state
            .users
            .by_handle(query)
            .or_else(|| state.users.by_name(query))
            .cloned()
    }

    /// All users in registration order.
    pub fn users(&self) -> Vec<User> {
        self.state.read().users.iter().cloned().collect()
    }

    // ── follow graph ────────────────────────────────────────────────

    /// Make `follower` follow `followee`. Following twice is a no-op.
    pub fn follow(&self, follower: &str, followee: &str) -> Result<()> {
        let mut state = self.state.write();
        if state.users.follow(follower, followee)? {
            debug!("@{} now follows @{}", follower, followee);
        }
        Ok(())
    }

    /// Remove the edge `follower → followee`, if present.
    pub fn unfollow(&self, follower: &str, followee: &str) -> Result<()> {
        let mut state = self.state.write();
        if state.users.unfollow(follower, followee)? {
            debug!("@{} no longer follows @{}", follower, followee);
        }
        Ok(())
    }

    /// Apply many follow edges at once. Nothing changes if any pair is invalid.
    pub fn follow_all<'a, I>(&self, edges: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let edges: Vec<(&str, &str)> = edges.into_iter().collect();
        let mut state = self.state.write();

        for (follower, followee) in &edges {
            let a = normalize_handle(follower)?;
            let b = normalize_handle(followee)?;
            for key in [&a, &b] {
                if !state.users.contains(key) {
                    return Err(MurmurError::not_found(format!("user @{key}")));
                }
            }
            if a == b {
                return Err(MurmurError::invalid_argument(format!(
                    "@{a} cannot follow themselves"
                )));
            }
        }

        for (follower, followee) in edges {
            state.users.follow(follower, followee)?;
        }
        Ok(())
    }

    // ── posts ───────────────────────────────────────────────────────

    /// Publish a post by `author`.
    ///
    /// The post is stored, attached to its author and indexed in one step.
    pub fn add_post(&self, author: &str, content: &str) -> Result<Post> {
        let mut state = self.state.write();
        let post = Self::insert_post(&mut state, author, content)?;
        debug!("added post {} by @{}", post.id(), post.author());
        Ok(post)
    }

    /// Publish many posts, given as `(author, content)` pairs.
    ///
    /// Every author is checked before any post is stored.
    pub fn add_posts<'a, I>(&self, posts: I) -> Result<Vec<Post>>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let posts: Vec<(&str, &str)> = posts.into_iter().collect();
        let mut state = self.state.write();

        for (author, _) in &posts {
            Self::resolve_author(&state, author)?;
        }

        let mut added = Vec::with_capacity(posts.len());
        for (author, content) in posts {
            added.push(Self::insert_post(&mut state, author, content)?);
        }
        debug!("added {} posts in batch", added.len());
        Ok(added)
    }

    fn resolve_author(state: &GraphState, author: &str) -> Result<String> {
        state
            .users
            .by_handle(author)
            .map(|user| user.handle().to_string())
            .ok_or_else(|| MurmurError::not_found(format!("user @{}", author.trim())))
    }

    fn insert_post(state: &mut GraphState, author: &str, content: &str) -> Result<Post> {
        let author = Self::resolve_author(state, author)?;

        // The author exists and the lock is held, so none of the steps below can fail.
        let post = state.posts.create(author, content);
        state.users.attach_post(post.author(), post.id())?;
        state.index.index_post(&post);
        Ok(post)
    }

    /// Delete a post, detaching it from its author and the index.
    pub fn delete_post(&self, id: PostId) -> Result<Post> {
        let mut state = self.state.write();
        let state = &mut *state;

        let post = state.posts.delete(id)?;
        state.users.detach_post(post.author(), id);
        state.index.remove_post(&post);

        debug!("deleted post {} by @{}", id, post.author());
        Ok(post)
    }

    pub fn get_post(&self, id: PostId) -> Option<Post> {
        self.state.read().posts.get(id).cloned()
    }

    /// Posts by `handle` in creation order. Unknown users have no posts.
    pub fn posts_by(&self, handle: &str) -> Vec<Post> {
        let state = self.state.read();
        match state.users.by_handle(handle) {
            Some(user) => Self::collect_posts(&state, user),
            None => Vec::new(),
        }
    }

    /// Posts by everyone `handle` follows, grouped by followee in follow
    /// order, each group in creation order.
    pub fn feed_for(&self, handle: &str) -> Vec<Post> {
        let state = self.state.read();
        let Some(user) = state.users.by_handle(handle) else {
            return Vec::new();
        };

        user.following()
            .iter()
            .filter_map(|followee| state.users.by_handle(followee))
            .flat_map(|followee| Self::collect_posts(&state, followee))
            .collect()
    }

    fn collect_posts(state: &GraphState, user: &User) -> Vec<Post> {
        user.post_ids()
            .iter()
            .filter_map(|&id| state.posts.get(id).cloned())
            .collect()
    }

    // ── search ──────────────────────────────────────────────────────

    /// Posts matching `query`, best first.
    ///
    /// An empty or punctuation-only query returns no posts.
    pub fn search(&self, query: &str, top_k: Option<usize>) -> Vec<Post> {
        self.search_with(&SearchRequest {
            query: query.to_string(),
            top_k,
        })
        .into_iter()
        .map(|hit| hit.item)
        .collect()
    }

    /// Posts matching the request, with their overlap scores.
    pub fn search_with(&self, request: &SearchRequest) -> Vec<SearchHit<Post>> {
        let top_k = request.top_k.or(self.config.default_top_k);
        let state = self.state.read();

        state
            .index
            .search(&request.query, top_k, &state.posts)
            .into_iter()
            .filter_map(|hit| {
                state.posts.get(hit.key).map(|post| SearchHit {
                    item: post.clone(),
                    score: hit.score,
                })
            })
            .collect()
    }

    /// Users whose name matches `query`, best first.
    pub fn search_users(&self, query: &str, top_k: Option<usize>) -> Vec<User> {
        self.search_users_with(&SearchRequest {
            query: query.to_string(),
            top_k,
        })
        .into_iter()
        .map(|hit| hit.item)
        .collect()
    }

    /// Users matching the request, with their overlap scores.
    ///
    /// Unlike post search, a user is a candidate only when their whole
    /// case-folded name equals one of the query keywords. Candidates are
    /// then scored by the overlap of their name tokens with the keywords.
    pub fn search_users_with(&self, request: &SearchRequest) -> Vec<SearchHit<User>> {
        let top_k = request.top_k.or(self.config.default_top_k);
        let keywords: AHashSet<String> = self.tokenizer.tokenize(&request.query).into_iter().collect();
        if keywords.is_empty() {
            return Vec::new();
        }

        let state = self.state.read();
        let hits: Vec<ScoredHit<&User>> = state
            .users
            .iter()
            .filter(|user| keywords.contains(&self.tokenizer.fold(user.name())))
            .map(|user| ScoredHit {
                key: user,
                score: overlap_score(&self.tokenizer.tokenize(user.name()), &keywords),
                ordinal: user.seq(),
            })
            .collect();
        trace!(
            "user query {:?}: {} keywords, {} candidates",
            request.query,
            keywords.len(),
            hits.len()
        );

        rank(hits, top_k)
            .into_iter()
            .map(|hit| SearchHit {
                item: hit.key.clone(),
                score: hit.score,
            })
            .collect()
    }

    // ── introspection ───────────────────────────────────────────────

    /// Ids filed under `token` in the post index, repeats included.
    pub fn indexed_posts(&self, token: &str) -> Vec<PostId> {
        self.state.read().index.postings(token).to_vec()
    }

    /// Whether any index bucket still refers to `id`.
    pub fn is_indexed(&self, id: PostId) -> bool {
        self.state.read().index.references(id)
    }

    pub fn stats(&self) -> GraphStats {
        let state = self.state.read();
        GraphStats {
            users: state.users.len(),
            posts: state.posts.len(),
            terms: state.index.term_count(),
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> GraphStore {
        let store = GraphStore::new();
        store
            .add_users([("alice", "Alice"), ("bob", "Bob"), ("carol", "Carol")])
            .unwrap();
        store
    }

    #[test]
    fn test_add_user_requires_name_for_new_handle() {
        let store = GraphStore::new();
        let err = store.add_user("alice", None).unwrap_err();
        assert!(err.is_invalid_argument());

        let alice = store.add_user("Alice", Some("Alice A.")).unwrap();
        assert_eq!(alice.handle(), "alice");
        assert_eq!(store.add_user("ALICE", None).unwrap(), alice);
    }

    #[test]
    fn test_add_admin() {
        let store = store();
        let root = store.add_admin("root", "Root").unwrap();
        assert!(root.is_admin());
        // Existing users are returned unchanged.
        assert!(!store.add_admin("alice", "Alice").unwrap().is_admin());
    }

    #[test]
    fn test_add_post_attaches_and_indexes() {
        let store = store();
        let post = store.add_post("Alice", "Hello world").unwrap();

        assert_eq!(post.author(), "alice");
        assert!(store.user_by_handle("alice").unwrap().post_ids().contains(&post.id()));
        assert_eq!(store.indexed_posts("hello"), [post.id()]);
        assert_eq!(store.get_post(post.id()), Some(post));
    }

    #[test]
    fn test_add_post_unknown_author() {
        let store = store();
        let err = store.add_post("ghost", "hi").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.stats().posts, 0);
        assert_eq!(store.stats().terms, 0);
    }

    #[test]
    fn test_delete_post() {
        let store = store();
        let post = store.add_post("alice", "cat").unwrap();
        let removed = store.delete_post(post.id()).unwrap();

        assert_eq!(removed, post);
        assert!(store.get_post(post.id()).is_none());
        assert!(store.user_by_handle("alice").unwrap().post_ids().is_empty());
        assert!(!store.is_indexed(post.id()));
        assert!(store.delete_post(post.id()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_batch_add_posts_is_all_or_nothing() {
        let store = store();
        let err = store
            .add_posts([("alice", "one"), ("ghost", "two")])
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.stats().posts, 0);

        let posts = store.add_posts([("alice", "one"), ("bob", "two")]).unwrap();
        assert_eq!(posts.len(), 2);
    }

    #[test]
    fn test_batch_add_users_is_all_or_nothing() {
        let store = GraphStore::new();
        let err = store.add_users([("dave", "Dave"), ("erin", " ")]).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(store.stats().users, 0);
    }

    #[test]
    fn test_batch_follow_is_all_or_nothing() {
        let store = store();
        let err = store
            .follow_all([("alice", "bob"), ("bob", "ghost")])
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(store.user_by_handle("alice").unwrap().following().is_empty());

        store.follow_all([("alice", "bob"), ("alice", "carol")]).unwrap();
        assert_eq!(store.user_by_handle("alice").unwrap().following_count(), 2);
    }

    #[test]
    fn test_feed_order() {
        let store = store();
        let b1 = store.add_post("bob", "b1").unwrap();
        let c1 = store.add_post("carol", "c1").unwrap();
        let b2 = store.add_post("bob", "b2").unwrap();
        store.add_post("alice", "mine").unwrap();

        store.follow("alice", "carol").unwrap();
        store.follow("alice", "bob").unwrap();

        let feed: Vec<PostId> = store.feed_for("alice").iter().map(Post::id).collect();
        assert_eq!(feed, [c1.id(), b1.id(), b2.id()]);

        assert!(store.feed_for("bob").is_empty());
        assert!(store.feed_for("ghost").is_empty());
    }

    #[test]
    fn test_posts_by() {
        let store = store();
        let first = store.add_post("bob", "first").unwrap();
        let second = store.add_post("bob", "second").unwrap();
        assert_eq!(store.posts_by("BOB"), [first, second]);
        assert!(store.posts_by("ghost").is_empty());
    }

    #[test]
    fn test_find_user() {
        let store = store();
        store.add_user("bobby", Some("Robert")).unwrap();
        assert_eq!(store.find_user("BOB").unwrap().handle(), "bob");
        assert_eq!(store.find_user("robert").unwrap().handle(), "bobby");
        assert!(store.find_user("nobody").is_none());
    }

    #[test]
    fn test_search_users_exact_name_candidates() {
        let store = store();
        store.add_user("alice2", Some("Alice Smith")).unwrap();

        let hits: Vec<String> = store
            .search_users("alice", None)
            .iter()
            .map(|u| u.handle().to_string())
            .collect();
        // "Alice Smith" is not a whole-name match for the keyword "alice".
        assert_eq!(hits, ["alice"]);

        let hits = store.search_users("bob carol", None);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].handle(), "bob");
        assert_eq!(store.search_users("bob carol", Some(1)).len(), 1);
        assert!(store.search_users("", None).is_empty());
    }

    #[test]
    fn test_default_top_k() {
        let config = GraphConfig::builder().default_top_k(1).build();
        let store = GraphStore::with_config(config).unwrap();
        store.add_user("alice", Some("Alice")).unwrap();
        store.add_post("alice", "cat").unwrap();
        store.add_post("alice", "cat cat").unwrap();

        assert_eq!(store.search("cat", None).len(), 1);
        assert_eq!(store.search("cat", Some(5)).len(), 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GraphConfig::builder().default_top_k(0).build();
        assert!(GraphStore::with_config(config).is_err());
    }

    #[test]
    fn test_search_with_scores() {
        let store = store();
        store.add_post("alice", "cat dog cat").unwrap();
        store.add_post("bob", "dog dog").unwrap();

        let hits = store.search_with(&SearchRequest::new("cat dog"));
        let scores: Vec<usize> = hits.iter().map(|h| h.score).collect();
        assert_eq!(scores, [3, 2]);
    }
}
