//! ember-core - Core library for Ember
//!
//! This crate contains the journal models, the local store, the remote store
//! client, and the sync engine that reconciles the two across intermittent
//! connectivity.

pub mod auth;
pub mod config;
pub mod connectivity;
pub mod db;
pub mod error;
pub mod models;
pub mod remote;
pub mod sync;
mod util;

pub use error::{Error, Result};
pub use models::{EntryId, JournalEntry, Mood, UserProfile};
pub use sync::{PullSummary, PushSummary, SkipReason, SyncEngine, SyncWorker};
