//! Data models for Ember

mod entry;
mod profile;

pub use entry::{EntryId, InvalidMood, JournalEntry, Mood};
pub use profile::UserProfile;
