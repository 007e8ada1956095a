//! Reconciliation between the local and remote journal stores.
//!
//! The engine runs two passes. Push walks the local dirty queue and brings
//! the remote store up to date, propagating tombstones as deletions. Pull
//! walks the remote snapshot and brings the local store up to date,
//! resolving conflicting edits by last-write-wins on `last_updated`.
//! Deletions only travel local-to-remote; remote absence is never read as
//! "delete locally".

mod matching;
mod worker;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::auth::{Session, SessionProvider};
use crate::connectivity::Connectivity;
use crate::db::{JournalStore, ProfileStore};
use crate::error::{Error, Result};
use crate::models::{JournalEntry, UserProfile};
use crate::remote::RemoteStore;

pub use matching::{timestamps_match, MATCH_TOLERANCE_MS};
pub use worker::SyncWorker;

/// Why a pass did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No signed-in user; nothing to reconcile
    NoSession,
    /// Network currently unavailable
    Offline,
}

/// Outcome of a push pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushSummary {
    /// Entries created or replaced remotely
    pub pushed: usize,
    /// Tombstones propagated and hard-deleted locally
    pub deleted: usize,
    /// Entries left dirty for the next pass
    pub failed: usize,
    /// Set when the pass did not run at all
    pub skipped: Option<SkipReason>,
}

impl PushSummary {
    const fn skip(reason: SkipReason) -> Self {
        Self {
            pushed: 0,
            deleted: 0,
            failed: 0,
            skipped: Some(reason),
        }
    }
}

/// Outcome of a pull pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullSummary {
    /// Remote entries with no local counterpart, inserted clean
    pub added: usize,
    /// Local entries overwritten by a newer remote version
    pub updated: usize,
    /// Matched entries where the local copy stayed authoritative
    pub unchanged: usize,
    /// Set when the pass did not run at all
    pub skipped: Option<SkipReason>,
}

impl PullSummary {
    const fn skip(reason: SkipReason) -> Self {
        Self {
            added: 0,
            updated: 0,
            unchanged: 0,
            skipped: Some(reason),
        }
    }
}

enum PushOutcome {
    Pushed,
    Deleted,
}

/// Reconciles a local, always-available store with a remote, sometimes
/// unreachable one.
///
/// Passes are serialized behind an internal lock, so concurrent triggers
/// (connectivity restored, app foregrounded, post-mutation push) never
/// interleave at the record level.
pub struct SyncEngine<L, R, P> {
    local: L,
    remote: R,
    profiles: P,
    sessions: Arc<dyn SessionProvider>,
    connectivity: Arc<dyn Connectivity>,
    pass_lock: Mutex<()>,
}

impl<L, R, P> SyncEngine<L, R, P>
where
    L: JournalStore,
    R: RemoteStore,
    P: ProfileStore,
{
    /// Create an engine over the given stores and collaborators
    pub fn new(
        local: L,
        remote: R,
        profiles: P,
        sessions: Arc<dyn SessionProvider>,
        connectivity: Arc<dyn Connectivity>,
    ) -> Self {
        Self {
            local,
            remote,
            profiles,
            sessions,
            connectivity,
            pass_lock: Mutex::new(()),
        }
    }

    /// Preconditions shared by both passes: network up, user signed in.
    fn ready(&self) -> std::result::Result<Session, SkipReason> {
        if !self.connectivity.is_online() {
            return Err(SkipReason::Offline);
        }
        self.sessions.active().ok_or(SkipReason::NoSession)
    }

    /// Push every dirty local entry to the remote store.
    ///
    /// Each entry is pushed independently: a fault on one is logged and the
    /// loop continues, leaving that entry dirty for the next pass. Only a
    /// failure to fetch the remote snapshot aborts the pass.
    pub async fn push_all(&self) -> Result<PushSummary> {
        let _pass = self.pass_lock.lock().await;

        let session = match self.ready() {
            Ok(session) => session,
            Err(reason) => {
                tracing::debug!(?reason, "push pass skipped");
                return Ok(PushSummary::skip(reason));
            }
        };
        let user_id = session.user_id;

        let dirty = self.local.list_dirty(&user_id).await?;
        if dirty.is_empty() {
            return Ok(PushSummary::default());
        }

        let mut snapshot = self.remote.list_all(&user_id).await?;
        let mut summary = PushSummary::default();

        for mut entry in dirty {
            match self.push_entry(&user_id, &mut entry, &mut snapshot).await {
                Ok(PushOutcome::Pushed) => summary.pushed += 1,
                Ok(PushOutcome::Deleted) => summary.deleted += 1,
                Err(error) => {
                    summary.failed += 1;
                    tracing::warn!(entry_id = %entry.id, %error, "entry push failed; will retry next pass");
                }
            }
        }

        tracing::info!(
            pushed = summary.pushed,
            deleted = summary.deleted,
            failed = summary.failed,
            "push pass finished"
        );
        Ok(summary)
    }

    async fn push_entry(
        &self,
        user_id: &str,
        entry: &mut JournalEntry,
        snapshot: &mut Vec<(String, JournalEntry)>,
    ) -> Result<PushOutcome> {
        let matched = existing_key(entry, snapshot);

        if entry.is_tombstoned {
            if let Some(key) = matched {
                self.remote.delete(user_id, &key).await?;
                snapshot.retain(|(existing, _)| existing != &key);
            }
            // Deletion confirmed (or confirmed unnecessary): the tombstone
            // may now leave the local store. This is the only path that
            // physically removes local rows.
            self.local.hard_delete(entry).await?;
            return Ok(PushOutcome::Deleted);
        }

        let key = match matched {
            Some(key) => {
                self.remote.replace(user_id, &key, entry).await?;
                key
            }
            None => self.remote.create(user_id, entry).await?,
        };

        entry.remote_key = Some(key.clone());
        entry.mark_synced();
        self.local.upsert(entry).await?;

        // Keep the in-pass snapshot current so later candidates can match
        // records this pass just wrote
        match snapshot.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = entry.clone(),
            None => snapshot.push((key, entry.clone())),
        }
        Ok(PushOutcome::Pushed)
    }

    /// Bring the local store up to date from the full remote snapshot.
    ///
    /// Remote entries without a local counterpart are inserted clean;
    /// matched entries resolve by last-write-wins on `last_updated`, with
    /// the local id preserved. Remote absence never deletes local rows.
    pub async fn pull_all(&self) -> Result<PullSummary> {
        let _pass = self.pass_lock.lock().await;

        let session = match self.ready() {
            Ok(session) => session,
            Err(reason) => {
                tracing::debug!(?reason, "pull pass skipped");
                return Ok(PullSummary::skip(reason));
            }
        };
        let user_id = session.user_id;

        let snapshot = self.remote.list_all(&user_id).await?;
        let locals = self.local.list_active(&user_id).await?;

        let mut summary = PullSummary::default();
        for (key, mut incoming) in snapshot {
            incoming.user_id.clone_from(&user_id);
            incoming.remote_key = Some(key);
            incoming.mark_synced();
            incoming.is_tombstoned = false;

            match matching::find_local(incoming.occurred_at, &locals) {
                None => {
                    self.local.upsert(&incoming).await?;
                    summary.added += 1;
                }
                Some(local) if incoming.last_updated > local.last_updated => {
                    // Remote wins: overwrite the payload in place, keeping
                    // the local surrogate key
                    incoming.id = local.id;
                    self.local.upsert(&incoming).await?;
                    summary.updated += 1;
                    tracing::debug!(entry_id = %incoming.id, "remote version won last-write-wins");
                }
                Some(_) => summary.unchanged += 1,
            }
        }

        tracing::info!(
            added = summary.added,
            updated = summary.updated,
            unchanged = summary.unchanged,
            "pull pass finished"
        );
        Ok(summary)
    }

    /// Fetch the user's remote profile; a successful fetch overwrites the
    /// local cache wholesale. Skips silently when offline or signed out.
    pub async fn refresh_profile(&self) -> Result<Option<UserProfile>> {
        let session = match self.ready() {
            Ok(session) => session,
            Err(reason) => {
                tracing::debug!(?reason, "profile refresh skipped");
                return Ok(None);
            }
        };

        let Some(mut profile) = self.remote.fetch_profile(&session.user_id).await? else {
            return Ok(None);
        };
        profile.user_id.clone_from(&session.user_id);
        self.profiles.put(&profile).await?;
        Ok(Some(profile))
    }

    /// Save the profile: remote store first, then mirror into the cache.
    ///
    /// This is a foreground action; unlike the passes, faults propagate to
    /// the caller.
    pub async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        let session = self
            .sessions
            .active()
            .ok_or_else(|| Error::Auth("no active session".to_string()))?;

        self.remote.put_profile(&session.user_id, profile).await?;

        let mut cached = profile.clone();
        cached.user_id = session.user_id;
        self.profiles.put(&cached).await?;
        Ok(())
    }

    /// Last profile the remote store returned, if any
    pub async fn cached_profile(&self) -> Result<Option<UserProfile>> {
        let Some(session) = self.sessions.current() else {
            return Ok(None);
        };
        self.profiles.get(&session.user_id).await
    }
}

/// Remote key a dirty entry should target: the key it was last stored
/// under, when still present, otherwise whatever the timestamp correlation
/// finds.
fn existing_key(entry: &JournalEntry, snapshot: &[(String, JournalEntry)]) -> Option<String> {
    if let Some(key) = entry.remote_key.as_ref() {
        if snapshot.iter().any(|(existing, _)| existing == key) {
            return Some(key.clone());
        }
    }
    matching::find_match(entry.occurred_at, snapshot).map(|(key, _)| key.clone())
}
