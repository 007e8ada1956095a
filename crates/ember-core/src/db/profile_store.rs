//! Read-through cache for remote user profiles.

use std::future::Future;
use std::sync::Arc;

use libsql::params;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::UserProfile;
use crate::util::now_ms;

use super::Database;

/// Local profile cache operations.
///
/// The cache holds whatever the remote store last returned; a successful
/// fetch always overwrites it wholesale.
pub trait ProfileStore {
    /// Cached profile for the user, if one was ever fetched
    fn get(&self, user_id: &str) -> impl Future<Output = Result<Option<UserProfile>>> + Send;

    /// Overwrite the cached profile
    fn put(&self, profile: &UserProfile) -> impl Future<Output = Result<()>> + Send;
}

/// libSQL implementation of `ProfileStore`
#[derive(Clone)]
pub struct LibSqlProfileStore {
    db: Arc<Mutex<Database>>,
}

impl LibSqlProfileStore {
    /// Create a store over a shared database handle
    #[must_use]
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }
}

impl ProfileStore for LibSqlProfileStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let db = self.db.lock().await;
        let mut rows = db
            .connection()
            .query(
                "SELECT user_id, display_name, email, avatar_ref
                 FROM profiles WHERE user_id = ?",
                params![user_id],
            )
            .await?;

        let Some(row) = rows.next().await? else {
            return Ok(None);
        };

        Ok(Some(UserProfile {
            user_id: row.get(0)?,
            display_name: row.get(1)?,
            email: row.get(2)?,
            avatar_ref: super::journal_store::optional_text(&row, 3)?,
        }))
    }

    async fn put(&self, profile: &UserProfile) -> Result<()> {
        let db = self.db.lock().await;
        db.connection()
            .execute(
                "INSERT INTO profiles (user_id, display_name, email, avatar_ref, fetched_at)
                 VALUES (?, ?, ?, ?, ?)
                 ON CONFLICT(user_id) DO UPDATE SET
                     display_name = excluded.display_name,
                     email = excluded.email,
                     avatar_ref = excluded.avatar_ref,
                     fetched_at = excluded.fetched_at",
                params![
                    profile.user_id.clone(),
                    profile.display_name.clone(),
                    profile.email.clone(),
                    super::journal_store::text_or_null(profile.avatar_ref.as_deref()),
                    now_ms()
                ],
            )
            .await?;
        Ok(())
    }
}
