//! Cross-store record matching.
//!
//! The local and remote stores do not share a primary key at creation time:
//! the remote key only exists after a first push, and pulled records never
//! retroactively receive a shared id. Correlation therefore leans on the
//! business timestamp. Entries logged within the same second can merge;
//! per-user journals are sparse enough in practice that the window is
//! accepted.

use crate::models::JournalEntry;

/// Two `occurred_at` timestamps denote the same logical entry when they
/// differ by less than this many milliseconds.
pub const MATCH_TOLERANCE_MS: i64 = 1_000;

/// Whether two `occurred_at` timestamps denote the same logical entry
#[must_use]
pub const fn timestamps_match(a: i64, b: i64) -> bool {
    (a - b).abs() < MATCH_TOLERANCE_MS
}

/// Find the remote snapshot record matching the given timestamp
pub fn find_match(occurred_at: i64, snapshot: &[(String, JournalEntry)]) -> Option<&(String, JournalEntry)> {
    snapshot
        .iter()
        .find(|(_, entry)| timestamps_match(occurred_at, entry.occurred_at))
}

/// Find the local record matching the given timestamp
pub fn find_local(occurred_at: i64, entries: &[JournalEntry]) -> Option<&JournalEntry> {
    entries
        .iter()
        .find(|entry| timestamps_match(occurred_at, entry.occurred_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JournalEntry, Mood};

    #[test]
    fn timestamps_within_tolerance_match() {
        assert!(timestamps_match(10_000, 10_000));
        assert!(timestamps_match(10_000, 10_900));
        assert!(timestamps_match(10_900, 10_000));
    }

    #[test]
    fn timestamps_at_or_beyond_tolerance_do_not_match() {
        assert!(!timestamps_match(10_000, 11_000));
        assert!(!timestamps_match(10_000, 11_100));
        assert!(!timestamps_match(11_100, 10_000));
    }

    #[test]
    fn find_match_returns_first_candidate_within_tolerance() {
        let snapshot = vec![
            ("-a".to_string(), JournalEntry::new("u", 5_000, Mood::Okay)),
            ("-b".to_string(), JournalEntry::new("u", 10_500, Mood::Okay)),
        ];

        let found = find_match(10_000, &snapshot).map(|(key, _)| key.as_str());
        assert_eq!(found, Some("-b"));
        assert!(find_match(20_000, &snapshot).is_none());
    }

    #[test]
    fn find_local_scans_entries() {
        let entries = vec![
            JournalEntry::new("u", 5_000, Mood::Okay),
            JournalEntry::new("u", 9_200, Mood::Good),
        ];

        let found = find_local(10_000, &entries).map(|entry| entry.occurred_at);
        assert_eq!(found, Some(9_200));
        assert!(find_local(1_000, &entries).is_none());
    }
}
