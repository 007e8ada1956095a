//! Journal entry model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::util::now_ms;

/// A unique identifier for a journal entry, using UUID v7 (time-sortable)
///
/// Assigned when the entry is created on this device and stable for the
/// entry's local lifetime. It is never sent to the remote store; the remote
/// store keys entries with its own opaque keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Create a new unique entry ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Score outside the 1..=5 mood scale
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid mood score: {0} (expected 1..=5)")]
pub struct InvalidMood(pub i64);

/// Five-point mood scale, wire-encoded as its integer score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Mood {
    Awful = 1,
    Bad = 2,
    Okay = 3,
    Good = 4,
    Great = 5,
}

impl Mood {
    /// Numeric score, 1 (awful) through 5 (great)
    #[must_use]
    pub const fn score(self) -> u8 {
        self as u8
    }

    /// Parse a stored or wire score
    pub const fn from_score(score: i64) -> Result<Self, InvalidMood> {
        match score {
            1 => Ok(Self::Awful),
            2 => Ok(Self::Bad),
            3 => Ok(Self::Okay),
            4 => Ok(Self::Good),
            5 => Ok(Self::Great),
            other => Err(InvalidMood(other)),
        }
    }

    /// Human-readable label for display
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Awful => "awful",
            Self::Bad => "bad",
            Self::Okay => "okay",
            Self::Good => "good",
            Self::Great => "great",
        }
    }
}

impl From<Mood> for u8 {
    fn from(mood: Mood) -> Self {
        mood.score()
    }
}

impl TryFrom<u8> for Mood {
    type Error = InvalidMood;

    fn try_from(score: u8) -> Result<Self, Self::Error> {
        Self::from_score(i64::from(score))
    }
}

/// A journal entry, the unit of synchronization.
///
/// Fields marked `#[serde(skip)]` are local bookkeeping and never appear in
/// the remote payload: the local id, the remote key the entry is stored
/// under, and the dirty/tombstone flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Local surrogate key
    #[serde(skip)]
    pub id: EntryId,
    /// Opaque key assigned by the remote store on first successful push
    #[serde(skip)]
    pub remote_key: Option<String>,
    /// Owner; partitions every query and every remote path
    pub user_id: String,
    /// The moment the entry is about (Unix ms); cross-store correlation signal
    pub occurred_at: i64,
    /// Last local content mutation (Unix ms); drives last-write-wins
    pub last_updated: i64,
    /// Mood logged for this entry
    pub mood: Mood,
    /// Optional free-text note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Optional opaque reference to an attached image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    /// Local content diverged from the last confirmed-synced state
    #[serde(skip)]
    pub is_dirty: bool,
    /// Deleted locally; retained until the deletion is confirmed remotely
    #[serde(skip)]
    pub is_tombstoned: bool,
}

impl JournalEntry {
    /// Create a new entry, dirty and not yet known to the remote store
    #[must_use]
    pub fn new(user_id: impl Into<String>, occurred_at: i64, mood: Mood) -> Self {
        Self {
            id: EntryId::new(),
            remote_key: None,
            user_id: user_id.into(),
            occurred_at,
            last_updated: now_ms(),
            mood,
            note: None,
            image_ref: None,
            is_dirty: true,
            is_tombstoned: false,
        }
    }

    /// Record a content mutation: refresh `last_updated`, mark dirty
    pub fn touch(&mut self) {
        self.last_updated = now_ms();
        self.is_dirty = true;
    }

    /// Mark deleted: tombstone, refresh `last_updated`, mark dirty.
    ///
    /// The row stays in the local store until the deletion is confirmed
    /// propagated to the remote store.
    pub fn tombstone(&mut self) {
        self.is_tombstoned = true;
        self.touch();
    }

    /// Clear the dirty flag after a confirmed remote write
    pub fn mark_synced(&mut self) {
        self.is_dirty = false;
    }
}
