//! User profile model

use serde::{Deserialize, Serialize};

/// Singleton-per-user profile record.
///
/// Synchronized with simpler semantics than journal entries: a successful
/// remote fetch always overwrites the local cache, and saves write the remote
/// store first, mirroring into the cache afterwards. No tombstones, no push
/// queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Owner id; derived from the remote path, not carried in the payload
    #[serde(skip)]
    pub user_id: String,
    /// Display name shown in the app
    #[serde(default)]
    pub display_name: String,
    /// Contact email
    #[serde(default)]
    pub email: String,
    /// Optional opaque reference to an avatar image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_ref: Option<String>,
}

impl UserProfile {
    /// Create an empty profile for the given user
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }
}
