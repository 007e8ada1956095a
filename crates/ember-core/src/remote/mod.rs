//! Remote store layer for Ember.
//!
//! The remote store is network-accessed, sometimes unreachable, and assigns
//! its own opaque keys on insert. Journal entries live under
//! `users/{userId}/journal/{key}`, the profile object under
//! `users/{userId}/profile`.

mod http;

use std::future::Future;

use crate::error::Result;
use crate::models::{JournalEntry, UserProfile};

pub use http::HttpRemoteStore;

/// Remote journal storage operations, scoped per user.
///
/// There is no pagination or delta support: callers re-fetch the whole
/// per-user collection on every pass. With per-user volumes in the hundreds
/// of rows, the simplicity wins over the extra round-trip cost.
pub trait RemoteStore {
    /// Full snapshot of the user's remote entries, keyed by remote key
    fn list_all(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<(String, JournalEntry)>>> + Send;

    /// Insert a new entry; the store assigns and returns its key
    fn create(
        &self,
        user_id: &str,
        entry: &JournalEntry,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Overwrite an existing entry wholesale
    fn replace(
        &self,
        user_id: &str,
        key: &str,
        entry: &JournalEntry,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Delete an entry. Idempotent: deleting an absent key succeeds, so a
    /// retry after a crash between delete and local cleanup is harmless.
    fn delete(&self, user_id: &str, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// Fetch the user's profile object, if present
    fn fetch_profile(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<UserProfile>>> + Send;

    /// Overwrite the user's profile object wholesale
    fn put_profile(
        &self,
        user_id: &str,
        profile: &UserProfile,
    ) -> impl Future<Output = Result<()>> + Send;
}
