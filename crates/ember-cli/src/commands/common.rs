use std::path::{Path, PathBuf};
use std::sync::Arc;

use ember_core::auth::{Session, SessionProvider, SessionStore};
use ember_core::config::AppConfig;
use ember_core::connectivity::AssumeOnline;
use ember_core::db::{Database, LibSqlJournalStore, LibSqlProfileStore};
use ember_core::remote::HttpRemoteStore;
use ember_core::{JournalEntry, SyncEngine, SyncWorker};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::cli::Cli;
use crate::error::CliError;

pub type Engine = SyncEngine<LibSqlJournalStore, HttpRemoteStore, LibSqlProfileStore>;

/// Everything a command needs: local stores, session, remote settings.
pub struct AppContext {
    pub journal: LibSqlJournalStore,
    pub profiles: LibSqlProfileStore,
    pub sessions: Arc<SessionStore>,
    pub session_path: PathBuf,
    pub remote_url: Option<String>,
}

impl AppContext {
    /// Resolve config, open the local database, and load the stored session.
    pub async fn open(cli: &Cli) -> Result<Self, CliError> {
        let config_dir = match cli.config.as_ref().and_then(|path| path.parent()) {
            Some(parent) => parent.to_path_buf(),
            None => dirs::config_dir()
                .ok_or(CliError::NoHomeDirectory)?
                .join("ember"),
        };
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| config_dir.join("config.json"));
        let config = AppConfig::load(&config_path)?.with_env_overrides();

        let remote_url = cli.remote_url.clone().or(config.remote_base_url);

        let db_path = match cli.db_path.clone().or(config.db_path) {
            Some(path) => path,
            None => dirs::data_dir()
                .ok_or(CliError::NoHomeDirectory)?
                .join("ember")
                .join("journal.db"),
        };
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Arc::new(Mutex::new(Database::open(&db_path).await?));
        let journal = LibSqlJournalStore::new(Arc::clone(&db));
        let profiles = LibSqlProfileStore::new(db);

        let session_path = config_dir.join("session.json");
        let sessions = Arc::new(SessionStore::default());
        if let Some(session) = load_session(&session_path)? {
            sessions.set(session);
        }

        Ok(Self {
            journal,
            profiles,
            sessions,
            session_path,
            remote_url,
        })
    }

    /// The stored session, expired or not; local commands only need the
    /// user id.
    pub fn current_session(&self) -> Result<Session, CliError> {
        self.sessions.current().ok_or(CliError::NotSignedIn)
    }

    /// Build a sync engine, requiring a configured remote.
    pub fn engine(&self) -> Result<Engine, CliError> {
        let url = self
            .remote_url
            .as_deref()
            .ok_or(CliError::MissingRemoteUrl)?;
        let remote = HttpRemoteStore::new(url, Arc::clone(&self.sessions) as Arc<dyn SessionProvider>)?;
        Ok(SyncEngine::new(
            self.journal.clone(),
            remote,
            self.profiles.clone(),
            Arc::clone(&self.sessions) as Arc<dyn SessionProvider>,
            Arc::new(AssumeOnline),
        ))
    }

    /// Build a sync engine if a remote is configured and valid.
    fn try_engine(&self) -> Option<Engine> {
        self.remote_url.as_ref()?;
        match self.engine() {
            Ok(engine) => Some(engine),
            Err(error) => {
                tracing::warn!(%error, "remote store unavailable");
                None
            }
        }
    }
}

/// Fire-and-forget push after a local mutation.
///
/// Failures stay in the background: the entry is dirty and will retry on
/// the next sync, so the foreground command still succeeds.
pub async fn best_effort_push(ctx: &AppContext) {
    let Some(engine) = ctx.try_engine() else {
        tracing::debug!("no remote configured; entry stays queued locally");
        return;
    };
    let worker = SyncWorker::spawn(Arc::new(engine));
    worker.request_push();
    worker.shutdown().await;
}

/// Load the stored session, if any.
pub fn load_session(path: &Path) -> Result<Option<Session>, CliError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&raw)?))
}

/// Persist the session next to the config file.
pub fn save_session(path: &Path, session: &Session) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(session)?)?;
    Ok(())
}

/// Remove the stored session; absent is fine.
pub fn clear_session(path: &Path) -> Result<(), CliError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(error.into()),
    }
}

/// Serializable entry view for `--json` output.
#[derive(Debug, Serialize)]
pub struct EntryListItem {
    pub id: String,
    pub occurred_at: i64,
    pub occurred_at_iso: String,
    pub mood: u8,
    pub mood_label: &'static str,
    pub note: Option<String>,
    pub image_ref: Option<String>,
    pub synced: bool,
}

pub fn entry_to_list_item(entry: &JournalEntry) -> EntryListItem {
    EntryListItem {
        id: entry.id.to_string(),
        occurred_at: entry.occurred_at,
        occurred_at_iso: format_timestamp(entry.occurred_at),
        mood: entry.mood.score(),
        mood_label: entry.mood.label(),
        note: entry.note.clone(),
        image_ref: entry.image_ref.clone(),
        synced: !entry.is_dirty,
    }
}

pub fn format_entry_line(entry: &JournalEntry) -> String {
    let id = entry.id.to_string();
    let short_id = &id[..8.min(id.len())];
    let note = entry
        .note
        .as_deref()
        .and_then(|note| note.lines().next())
        .unwrap_or("");
    let marker = if entry.is_dirty { " (unsynced)" } else { "" };
    format!(
        "{short_id}  {}  {:<5}  {note}{marker}",
        format_timestamp(entry.occurred_at),
        entry.mood.label()
    )
}

pub fn format_timestamp(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms).map_or_else(
        || ms.to_string(),
        |datetime| datetime.format("%Y-%m-%d %H:%M").to_string(),
    )
}

/// Parse an RFC 3339 timestamp into Unix milliseconds.
pub fn parse_timestamp(raw: &str) -> Result<i64, CliError> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|datetime| datetime.with_timezone(&chrono::Utc).timestamp_millis())
        .map_err(|_| CliError::InvalidTimestamp(raw.to_string()))
}

/// Resolve an entry by id prefix among the user's active entries.
pub async fn resolve_entry(
    ctx: &AppContext,
    user_id: &str,
    prefix: &str,
) -> Result<JournalEntry, CliError> {
    use ember_core::db::JournalStore as _;

    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(CliError::UnknownEntry(prefix.to_string()));
    }

    let mut matches = ctx
        .journal
        .list_active(user_id)
        .await?
        .into_iter()
        .filter(|entry| entry.id.to_string().starts_with(prefix));

    let Some(first) = matches.next() else {
        return Err(CliError::UnknownEntry(prefix.to_string()));
    };
    if matches.next().is_some() {
        return Err(CliError::AmbiguousEntry(prefix.to_string()));
    }
    Ok(first)
}
