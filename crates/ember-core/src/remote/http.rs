//! HTTP implementation of the remote store.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::auth::SessionProvider;
use crate::error::{Error, Result};
use crate::models::{JournalEntry, UserProfile};
use crate::util::{compact_text, is_http_url, normalize_text_option};

use super::RemoteStore;

/// Remote journal store over HTTP/JSON with bearer-token auth.
#[derive(Clone)]
pub struct HttpRemoteStore {
    base_url: String,
    client: reqwest::Client,
    sessions: Arc<dyn SessionProvider>,
}

impl HttpRemoteStore {
    /// Create a store for the given base URL.
    ///
    /// The URL must carry an `http://` or `https://` scheme; a trailing
    /// slash is trimmed.
    pub fn new(base_url: impl Into<String>, sessions: Arc<dyn SessionProvider>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        Ok(Self {
            base_url,
            client: reqwest::Client::builder()
                .build()
                .map_err(Error::Network)?,
            sessions,
        })
    }

    fn token(&self) -> Result<String> {
        self.sessions
            .current()
            .map(|session| session.access_token)
            .ok_or_else(|| Error::Auth("no active session".to_string()))
    }

    fn journal_url(&self, user_id: &str) -> String {
        format!(
            "{}/users/{}/journal",
            self.base_url,
            urlencoding::encode(user_id)
        )
    }

    fn entry_url(&self, user_id: &str, key: &str) -> String {
        format!("{}/{}", self.journal_url(user_id), urlencoding::encode(key))
    }

    fn profile_url(&self, user_id: &str) -> String {
        format!(
            "{}/users/{}/profile",
            self.base_url,
            urlencoding::encode(user_id)
        )
    }
}

/// Map a non-success response to the right fault class.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = parse_api_error(status, &body);
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Err(Error::Auth(message))
    } else {
        Err(Error::Api(message))
    }
}

impl RemoteStore for HttpRemoteStore {
    async fn list_all(&self, user_id: &str) -> Result<Vec<(String, JournalEntry)>> {
        let response = self
            .client
            .get(self.journal_url(user_id))
            .bearer_auth(self.token()?)
            .header("Accept", "application/json")
            .send()
            .await?;
        let response = ensure_success(response).await?;

        // An empty collection arrives as JSON `null`, not `{}`
        let payload = response
            .json::<Option<HashMap<String, JournalEntry>>>()
            .await?;
        Ok(payload.unwrap_or_default().into_iter().collect())
    }

    async fn create(&self, user_id: &str, entry: &JournalEntry) -> Result<String> {
        let response = self
            .client
            .post(self.journal_url(user_id))
            .bearer_auth(self.token()?)
            .json(entry)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let payload = response.json::<CreatedKey>().await?;
        payload.into_key().ok_or_else(|| {
            Error::Api("create response did not include a record key".to_string())
        })
    }

    async fn replace(&self, user_id: &str, key: &str, entry: &JournalEntry) -> Result<()> {
        let response = self
            .client
            .put(self.entry_url(user_id, key))
            .bearer_auth(self.token()?)
            .json(entry)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete(&self, user_id: &str, key: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.entry_url(user_id, key))
            .bearer_auth(self.token()?)
            .send()
            .await?;

        // Already gone is as good as deleted
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        ensure_success(response).await?;
        Ok(())
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let response = self
            .client
            .get(self.profile_url(user_id))
            .bearer_auth(self.token()?)
            .header("Accept", "application/json")
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response).await?;

        let mut payload = response.json::<Option<UserProfile>>().await?;
        if let Some(profile) = payload.as_mut() {
            profile.user_id = user_id.to_string();
        }
        Ok(payload)
    }

    async fn put_profile(&self, user_id: &str, profile: &UserProfile) -> Result<()> {
        let response = self
            .client
            .put(self.profile_url(user_id))
            .bearer_auth(self.token()?)
            .json(profile)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

/// Create-response payload; the key arrives as `key` or (from the original
/// backend) `name`.
#[derive(Debug, Deserialize)]
struct CreatedKey {
    key: Option<String>,
    name: Option<String>,
}

impl CreatedKey {
    fn into_key(self) -> Option<String> {
        self.key
            .or(self.name)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

fn normalize_base_url(raw: String) -> Result<String> {
    let base_url = normalize_text_option(Some(raw))
        .ok_or_else(|| Error::InvalidInput("remote base URL must not be empty".to_string()))?;
    if is_http_url(&base_url) {
        Ok(base_url.trim_end_matches('/').to_string())
    } else {
        Err(Error::InvalidInput(
            "remote base URL must include http:// or https://".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_base_url_rejects_invalid_values() {
        assert!(normalize_base_url(String::new()).is_err());
        assert!(normalize_base_url("journal.example.com".to_string()).is_err());
    }

    #[test]
    fn normalize_base_url_trims_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://journal.example.com/ ".to_string()).unwrap(),
            "https://journal.example.com"
        );
    }

    #[test]
    fn created_key_accepts_either_field() {
        let from_key: CreatedKey = serde_json::from_str(r#"{"key": "-abc"}"#).unwrap();
        assert_eq!(from_key.into_key(), Some("-abc".to_string()));

        let from_name: CreatedKey = serde_json::from_str(r#"{"name": "-xyz"}"#).unwrap();
        assert_eq!(from_name.into_key(), Some("-xyz".to_string()));

        let empty: CreatedKey = serde_json::from_str(r#"{"key": "  "}"#).unwrap();
        assert_eq!(empty.into_key(), None);
    }

    #[test]
    fn parse_api_error_prefers_structured_message() {
        let message = parse_api_error(
            StatusCode::BAD_REQUEST,
            r#"{"message": "bad payload", "error": "ignored"}"#,
        );
        assert_eq!(message, "bad payload (400)");
    }

    #[test]
    fn parse_api_error_falls_back_to_body_then_status() {
        assert_eq!(
            parse_api_error(StatusCode::BAD_GATEWAY, "upstream broke"),
            "upstream broke (502)"
        );
        assert_eq!(parse_api_error(StatusCode::BAD_GATEWAY, "  "), "HTTP 502");
    }
}
