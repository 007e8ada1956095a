//! Journal entry store: the local, always-available side of sync.

use std::future::Future;
use std::sync::Arc;

use libsql::params;
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::models::{EntryId, JournalEntry, Mood};

use super::Database;

/// Local journal storage operations.
///
/// Normal reads (`list_active`, `get`) hide tombstoned rows; `list_dirty` is
/// the sync engine's push queue and returns every dirty row regardless of
/// tombstone state, in unspecified order.
pub trait JournalStore {
    /// All non-tombstoned entries for the user, newest `occurred_at` first
    fn list_active(&self, user_id: &str) -> impl Future<Output = Result<Vec<JournalEntry>>> + Send;

    /// All dirty entries for the user, tombstoned or not
    fn list_dirty(&self, user_id: &str) -> impl Future<Output = Result<Vec<JournalEntry>>> + Send;

    /// Look up a non-tombstoned entry by id
    fn get(&self, id: &EntryId) -> impl Future<Output = Result<Option<JournalEntry>>> + Send;

    /// Insert, or overwrite the row with the same id
    fn upsert(&self, entry: &JournalEntry) -> impl Future<Output = Result<()>> + Send;

    /// Tombstone the entry: mark deleted and dirty, refresh `last_updated`.
    /// The row is retained until the deletion is confirmed remotely.
    fn soft_delete(&self, entry: &mut JournalEntry) -> impl Future<Output = Result<()>> + Send;

    /// Physically remove the row. Only the sync engine calls this, after the
    /// remote deletion is confirmed or confirmed unnecessary.
    fn hard_delete(&self, entry: &JournalEntry) -> impl Future<Output = Result<()>> + Send;
}

const SELECT_COLUMNS: &str = "id, user_id, remote_key, occurred_at, last_updated, \
     mood, note, image_ref, is_dirty, is_tombstoned";

/// libSQL implementation of `JournalStore`
#[derive(Clone)]
pub struct LibSqlJournalStore {
    db: Arc<Mutex<Database>>,
}

impl LibSqlJournalStore {
    /// Create a store over a shared database handle
    #[must_use]
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    async fn query_entries(
        &self,
        sql: &str,
        parameters: impl libsql::params::IntoParams,
    ) -> Result<Vec<JournalEntry>> {
        let db = self.db.lock().await;
        let mut rows = db.connection().query(sql, parameters).await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(parse_entry(&row)?);
        }
        Ok(entries)
    }
}

/// Bind an optional text value
pub(crate) fn text_or_null(value: Option<&str>) -> libsql::Value {
    value.map_or(libsql::Value::Null, |text| {
        libsql::Value::Text(text.to_string())
    })
}

/// Read a nullable text column
pub(crate) fn optional_text(row: &libsql::Row, index: i32) -> Result<Option<String>> {
    match row.get_value(index)? {
        libsql::Value::Null => Ok(None),
        libsql::Value::Text(text) => Ok(Some(text)),
        other => Err(Error::InvalidInput(format!(
            "unexpected value in text column {index}: {other:?}"
        ))),
    }
}

/// Parse an entry from a database row
fn parse_entry(row: &libsql::Row) -> Result<JournalEntry> {
    let id: String = row.get(0)?;
    let mood_score: i64 = row.get(5)?;

    Ok(JournalEntry {
        id: id
            .parse()
            .map_err(|_| Error::InvalidInput(format!("invalid entry id: {id}")))?,
        user_id: row.get(1)?,
        remote_key: optional_text(row, 2)?,
        occurred_at: row.get(3)?,
        last_updated: row.get(4)?,
        mood: Mood::from_score(mood_score)
            .map_err(|invalid| Error::InvalidInput(invalid.to_string()))?,
        note: optional_text(row, 6)?,
        image_ref: optional_text(row, 7)?,
        is_dirty: row.get::<i32>(8)? != 0,
        is_tombstoned: row.get::<i32>(9)? != 0,
    })
}

impl JournalStore for LibSqlJournalStore {
    async fn list_active(&self, user_id: &str) -> Result<Vec<JournalEntry>> {
        self.query_entries(
            &format!(
                "SELECT {SELECT_COLUMNS} FROM entries
                 WHERE user_id = ? AND is_tombstoned = 0
                 ORDER BY occurred_at DESC"
            ),
            params![user_id],
        )
        .await
    }

    async fn list_dirty(&self, user_id: &str) -> Result<Vec<JournalEntry>> {
        self.query_entries(
            &format!(
                "SELECT {SELECT_COLUMNS} FROM entries
                 WHERE user_id = ? AND is_dirty = 1"
            ),
            params![user_id],
        )
        .await
    }

    async fn get(&self, id: &EntryId) -> Result<Option<JournalEntry>> {
        let entries = self
            .query_entries(
                &format!(
                    "SELECT {SELECT_COLUMNS} FROM entries
                     WHERE id = ? AND is_tombstoned = 0"
                ),
                params![id.as_str()],
            )
            .await?;
        Ok(entries.into_iter().next())
    }

    async fn upsert(&self, entry: &JournalEntry) -> Result<()> {
        let db = self.db.lock().await;
        db.connection()
            .execute(
                "INSERT INTO entries (id, user_id, remote_key, occurred_at, last_updated,
                                      mood, note, image_ref, is_dirty, is_tombstoned)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(id) DO UPDATE SET
                     user_id = excluded.user_id,
                     remote_key = excluded.remote_key,
                     occurred_at = excluded.occurred_at,
                     last_updated = excluded.last_updated,
                     mood = excluded.mood,
                     note = excluded.note,
                     image_ref = excluded.image_ref,
                     is_dirty = excluded.is_dirty,
                     is_tombstoned = excluded.is_tombstoned",
                params![
                    entry.id.as_str(),
                    entry.user_id.clone(),
                    text_or_null(entry.remote_key.as_deref()),
                    entry.occurred_at,
                    entry.last_updated,
                    i64::from(entry.mood.score()),
                    text_or_null(entry.note.as_deref()),
                    text_or_null(entry.image_ref.as_deref()),
                    i64::from(entry.is_dirty),
                    i64::from(entry.is_tombstoned)
                ],
            )
            .await?;
        Ok(())
    }

    async fn soft_delete(&self, entry: &mut JournalEntry) -> Result<()> {
        entry.tombstone();

        let db = self.db.lock().await;
        let rows = db
            .connection()
            .execute(
                "UPDATE entries
                 SET is_tombstoned = 1, is_dirty = 1, last_updated = ?
                 WHERE id = ?",
                params![entry.last_updated, entry.id.as_str()],
            )
            .await?;

        if rows == 0 {
            return Err(Error::NotFound(entry.id.to_string()));
        }
        Ok(())
    }

    async fn hard_delete(&self, entry: &JournalEntry) -> Result<()> {
        let db = self.db.lock().await;
        // Deleting an already-removed row is not an error; sync retries
        // after a crash may pass the same entry twice.
        db.connection()
            .execute("DELETE FROM entries WHERE id = ?", params![entry.id.as_str()])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn setup() -> LibSqlJournalStore {
        let db = Database::open_in_memory().await.unwrap();
        LibSqlJournalStore::new(Arc::new(Mutex::new(db)))
    }

    fn entry(user_id: &str, occurred_at: i64) -> JournalEntry {
        let mut entry = JournalEntry::new(user_id, occurred_at, Mood::Okay);
        entry.note = Some(format!("note at {occurred_at}"));
        entry
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn upsert_and_get_round_trip() {
        let store = setup().await;
        let mut original = entry("user-1", 10_000);
        original.remote_key = Some("-abc".to_string());
        original.image_ref = Some("img/1.jpg".to_string());

        store.upsert(&original).await.unwrap();
        let fetched = store.get(&original.id).await.unwrap().unwrap();

        assert_eq!(fetched, original);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn upsert_overwrites_existing_row() {
        let store = setup().await;
        let mut e = entry("user-1", 10_000);
        store.upsert(&e).await.unwrap();

        e.mood = Mood::Great;
        e.is_dirty = false;
        store.upsert(&e).await.unwrap();

        let fetched = store.get(&e.id).await.unwrap().unwrap();
        assert_eq!(fetched.mood, Mood::Great);
        assert!(!fetched.is_dirty);

        let all = store.list_active("user-1").await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn list_active_filters_and_orders() {
        let store = setup().await;
        let older = entry("user-1", 10_000);
        let newer = entry("user-1", 20_000);
        let mut gone = entry("user-1", 15_000);
        gone.is_tombstoned = true;
        let foreign = entry("user-2", 30_000);

        for e in [&older, &newer, &gone, &foreign] {
            store.upsert(e).await.unwrap();
        }

        let active = store.list_active("user-1").await.unwrap();
        let ids: Vec<EntryId> = active.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn list_dirty_includes_tombstoned_rows() {
        let store = setup().await;
        let mut clean = entry("user-1", 10_000);
        clean.is_dirty = false;
        let dirty = entry("user-1", 20_000);
        let mut tombstoned = entry("user-1", 30_000);
        tombstoned.is_tombstoned = true;

        for e in [&clean, &dirty, &tombstoned] {
            store.upsert(e).await.unwrap();
        }

        let mut dirty_ids: Vec<String> = store
            .list_dirty("user-1")
            .await
            .unwrap()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        dirty_ids.sort();

        let mut expected = vec![dirty.id.as_str(), tombstoned.id.as_str()];
        expected.sort();
        assert_eq!(dirty_ids, expected);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn soft_delete_marks_and_retains_the_row() {
        let store = setup().await;
        let mut e = entry("user-1", 10_000);
        e.is_dirty = false;
        e.last_updated = 1;
        store.upsert(&e).await.unwrap();

        store.soft_delete(&mut e).await.unwrap();

        assert!(e.is_tombstoned);
        assert!(e.is_dirty);
        assert!(e.last_updated > 1);

        // Hidden from normal reads, still queued for sync
        assert!(store.get(&e.id).await.unwrap().is_none());
        assert!(store.list_active("user-1").await.unwrap().is_empty());
        let dirty = store.list_dirty("user-1").await.unwrap();
        assert_eq!(dirty.len(), 1);
        assert!(dirty[0].is_tombstoned);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn soft_delete_unknown_entry_is_not_found() {
        let store = setup().await;
        let mut ghost = entry("user-1", 10_000);

        let result = store.soft_delete(&mut ghost).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn hard_delete_removes_the_row_and_is_idempotent() {
        let store = setup().await;
        let e = entry("user-1", 10_000);
        store.upsert(&e).await.unwrap();

        store.hard_delete(&e).await.unwrap();
        assert!(store.list_dirty("user-1").await.unwrap().is_empty());
        assert!(store.get(&e.id).await.unwrap().is_none());

        // Second delete of the same row must not fail
        store.hard_delete(&e).await.unwrap();
    }
}
