//! In-memory fakes and a wired-up engine harness for sync tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::auth::{Session, SessionProvider, SessionStore};
use crate::connectivity::{Connectivity, NetworkSwitch};
use crate::db::{Database, LibSqlJournalStore, LibSqlProfileStore};
use crate::error::{Error, Result};
use crate::models::{JournalEntry, UserProfile};
use crate::remote::RemoteStore;

use super::SyncEngine;

/// In-memory remote store with per-timestamp failure injection.
///
/// Writes go through a serde round trip so the fake observes exactly what
/// the wire would carry: no local ids, no dirty/tombstone flags.
#[derive(Default)]
pub(crate) struct FakeRemote {
    records: Mutex<Vec<(String, JournalEntry)>>,
    profile: Mutex<Option<UserProfile>>,
    next_key: AtomicUsize,
    calls: AtomicUsize,
    writes: AtomicUsize,
    deletes: AtomicUsize,
    poisoned: Mutex<Vec<i64>>,
}

impl FakeRemote {
    fn wire(entry: &JournalEntry) -> JournalEntry {
        serde_json::from_value(serde_json::to_value(entry).expect("serialize entry"))
            .expect("deserialize entry")
    }

    fn allocate_key(&self) -> String {
        format!("-K{}", self.next_key.fetch_add(1, Ordering::Relaxed))
    }

    fn should_fail(&self, occurred_at: i64) -> bool {
        self.poisoned.lock().unwrap().contains(&occurred_at)
    }

    /// Seed a record directly, bypassing the engine
    pub(crate) fn insert(&self, entry: &JournalEntry) -> String {
        let key = self.allocate_key();
        self.records
            .lock()
            .unwrap()
            .push((key.clone(), Self::wire(entry)));
        key
    }

    /// Snapshot of stored records
    pub(crate) fn entries(&self) -> Vec<(String, JournalEntry)> {
        self.records.lock().unwrap().clone()
    }

    /// Drop every stored record (as if another device deleted them)
    pub(crate) fn clear_entries(&self) {
        self.records.lock().unwrap().clear();
    }

    /// Make create/replace fail for entries with this `occurred_at`
    pub(crate) fn fail_writes_at(&self, occurred_at: i64) {
        self.poisoned.lock().unwrap().push(occurred_at);
    }

    pub(crate) fn clear_failures(&self) {
        self.poisoned.lock().unwrap().clear();
    }

    /// Total remote operations observed
    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Creates and replaces observed
    pub(crate) fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Deletes observed
    pub(crate) fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::Relaxed)
    }

    pub(crate) fn set_profile(&self, profile: &UserProfile) {
        *self.profile.lock().unwrap() = Some(profile.clone());
    }

    pub(crate) fn profile(&self) -> Option<UserProfile> {
        self.profile.lock().unwrap().clone()
    }
}

impl RemoteStore for Arc<FakeRemote> {
    async fn list_all(&self, _user_id: &str) -> Result<Vec<(String, JournalEntry)>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.entries())
    }

    async fn create(&self, _user_id: &str, entry: &JournalEntry) -> Result<String> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.should_fail(entry.occurred_at) {
            return Err(Error::Api("simulated remote write failure".to_string()));
        }
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(self.insert(entry))
    }

    async fn replace(&self, _user_id: &str, key: &str, entry: &JournalEntry) -> Result<()> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.should_fail(entry.occurred_at) {
            return Err(Error::Api("simulated remote write failure".to_string()));
        }
        let mut records = self.records.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|(existing, _)| existing == key)
            .ok_or_else(|| Error::Api(format!("no record under key {key}")))?;
        slot.1 = FakeRemote::wire(entry);
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn delete(&self, _user_id: &str, key: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.deletes.fetch_add(1, Ordering::Relaxed);
        // Idempotent by contract: deleting an absent key succeeds
        self.records
            .lock()
            .unwrap()
            .retain(|(existing, _)| existing != key);
        Ok(())
    }

    async fn fetch_profile(&self, _user_id: &str) -> Result<Option<UserProfile>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.profile())
    }

    async fn put_profile(&self, _user_id: &str, profile: &UserProfile) -> Result<()> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.set_profile(profile);
        Ok(())
    }
}

/// A fully wired engine over an in-memory local store and a fake remote.
pub(crate) struct Harness {
    pub(crate) engine: SyncEngine<LibSqlJournalStore, Arc<FakeRemote>, LibSqlProfileStore>,
    pub(crate) local: LibSqlJournalStore,
    pub(crate) profiles: LibSqlProfileStore,
    pub(crate) remote: Arc<FakeRemote>,
    pub(crate) sessions: Arc<SessionStore>,
    pub(crate) network: Arc<NetworkSwitch>,
}

pub(crate) async fn harness() -> Harness {
    let db = Arc::new(tokio::sync::Mutex::new(
        Database::open_in_memory().await.expect("open database"),
    ));
    let local = LibSqlJournalStore::new(Arc::clone(&db));
    let profiles = LibSqlProfileStore::new(db);
    let remote = Arc::new(FakeRemote::default());
    let sessions = Arc::new(SessionStore::with_session(Session::new(
        "user-1",
        "test-token",
    )));
    let network = Arc::new(NetworkSwitch::new(true));

    let engine = SyncEngine::new(
        local.clone(),
        Arc::clone(&remote),
        profiles.clone(),
        Arc::clone(&sessions) as Arc<dyn SessionProvider>,
        Arc::clone(&network) as Arc<dyn Connectivity>,
    );

    Harness {
        engine,
        local,
        profiles,
        remote,
        sessions,
        network,
    }
}
