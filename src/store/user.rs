//! User registry and follow bookkeeping.

use std::collections::BTreeSet;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{MurmurError, Result};
use crate::store::post::PostId;

/// A registered user.
///
/// Follow edges are stored on both ends: if `a.following()` lists `b`, then
/// `b.followers()` lists `a`. Both lists keep the order edges were created in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    handle: String,
    name: String,
    admin: bool,
    followers: Vec<String>,
    following: Vec<String>,
    post_ids: BTreeSet<PostId>,
    #[serde(skip)]
    seq: u64,
}

impl User {
    /// Lowercase handle, unique across the directory.
    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn followers(&self) -> &[String] {
        &self.followers
    }

    pub fn following(&self) -> &[String] {
        &self.following
    }

    pub fn follower_count(&self) -> usize {
        self.followers.len()
    }

    pub fn following_count(&self) -> usize {
        self.following.len()
    }

    pub fn is_following(&self, handle: &str) -> bool {
        self.following.iter().any(|h| h == handle)
    }

    /// Ids of posts owned by this user, in creation order.
    pub fn post_ids(&self) -> &BTreeSet<PostId> {
        &self.post_ids
    }

    /// Registration ordinal, used to break ranking ties.
    pub(crate) fn seq(&self) -> u64 {
        self.seq
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (@{})", self.name, self.handle)
    }
}

/// Normalize a raw handle into its lookup key.
pub fn normalize_handle(handle: &str) -> Result<String> {
    let handle = handle.trim();
    if handle.is_empty() {
        return Err(MurmurError::invalid_argument("handle must not be empty"));
    }
    Ok(handle.to_lowercase())
}

/// Registry of users keyed by normalized handle.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: AHashMap<String, User>,
    /// Handles in registration order.
    order: Vec<String>,
    next_seq: u64,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user, or return the existing one unchanged.
    ///
    /// `name` is only required when the handle is new.
    pub fn add(&mut self, handle: &str, name: Option<&str>, admin: bool) -> Result<&User> {
        let key = normalize_handle(handle)?;
        if !self.users.contains_key(&key) {
            let name = validate_name(&key, name)?;
            let user = User {
                handle: key.clone(),
                name: name.to_string(),
                admin,
                followers: Vec::new(),
                following: Vec::new(),
                post_ids: BTreeSet::new(),
                seq: self.next_seq,
            };
            self.next_seq += 1;
            self.order.push(key.clone());
            self.users.insert(key.clone(), user);
        }

        self.users
            .get(&key)
            .ok_or_else(|| MurmurError::not_found(format!("user @{key}")))
    }

    pub fn by_handle(&self, handle: &str) -> Option<&User> {
        let key = normalize_handle(handle).ok()?;
        self.users.get(&key)
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.by_handle(handle).is_some()
    }

    /// First user, in registration order, whose name matches `name` ignoring case.
    pub fn by_name(&self, name: &str) -> Option<&User> {
        let wanted = name.trim().to_lowercase();
        self.iter().find(|user| user.name.to_lowercase() == wanted)
    }

    /// Make `follower` follow `followee`.
    ///
    /// Returns `false` if the edge already existed.
    pub fn follow(&mut self, follower: &str, followee: &str) -> Result<bool> {
        let (follower, followee) = self.resolve_pair(follower, followee)?;
        if follower == followee {
            return Err(MurmurError::invalid_argument(format!(
                "@{follower} cannot follow themselves"
            )));
        }
        if self.users[&follower].is_following(&followee) {
            return Ok(false);
        }

        if let Some(user) = self.users.get_mut(&follower) {
            user.following.push(followee.clone());
        }
        if let Some(user) = self.users.get_mut(&followee) {
            user.followers.push(follower);
        }
        Ok(true)
    }

    /// Remove the edge `follower → followee`.
    ///
    /// Returns `false` if there was no such edge.
    pub fn unfollow(&mut self, follower: &str, followee: &str) -> Result<bool> {
        let (follower, followee) = self.resolve_pair(follower, followee)?;
        if !self.users[&follower].is_following(&followee) {
            return Ok(false);
        }

        if let Some(user) = self.users.get_mut(&follower) {
            user.following.retain(|h| *h != followee);
        }
        if let Some(user) = self.users.get_mut(&followee) {
            user.followers.retain(|h| *h != follower);
        }
        Ok(true)
    }

    /// Record that `handle` owns post `id`.
    pub fn attach_post(&mut self, handle: &str, id: PostId) -> Result<()> {
        let user = self.get_mut(handle)?;
        user.post_ids.insert(id);
        Ok(())
    }

    /// Forget that `handle` owns post `id`. Returns whether it was recorded.
    pub fn detach_post(&mut self, handle: &str, id: PostId) -> bool {
        match self.get_mut(handle) {
            Ok(user) => user.post_ids.remove(&id),
            Err(_) => false,
        }
    }

    /// Delete a user and purge its handle from every other user's edges.
    ///
    /// The removed user is returned so the caller can cascade over its posts.
    pub fn remove(&mut self, handle: &str) -> Result<User> {
        let key = normalize_handle(handle)?;
        let removed = self
            .users
            .remove(&key)
            .ok_or_else(|| MurmurError::not_found(format!("user @{key}")))?;
        self.order.retain(|h| *h != key);

        for user in self.users.values_mut() {
            user.followers.retain(|h| *h != key);
            user.following.retain(|h| *h != key);
        }

        Ok(removed)
    }

    /// Users in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.order.iter().filter_map(|h| self.users.get(h))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn get_mut(&mut self, handle: &str) -> Result<&mut User> {
        let key = normalize_handle(handle)?;
        self.users
            .get_mut(&key)
            .ok_or_else(|| MurmurError::not_found(format!("user @{key}")))
    }

    fn resolve_pair(&self, a: &str, b: &str) -> Result<(String, String)> {
        let a = normalize_handle(a)?;
        let b = normalize_handle(b)?;
        for key in [&a, &b] {
            if !self.users.contains_key(key) {
                return Err(MurmurError::not_found(format!("user @{key}")));
            }
        }
        Ok((a, b))
    }
}

pub(crate) fn validate_name<'a>(handle: &str, name: Option<&'a str>) -> Result<&'a str> {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(MurmurError::invalid_argument(format!(
            "a name is required to register @{handle}"
        ))),
    }
}
