//! Announcement API HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{AnnouncementsResponse, ErrorResponse, UnreadCountResponse};
use crate::domain::entities::{Announcement, UserIdentity};
use crate::domain::errors::RemoteError;
use crate::domain::ports::AnnouncementSourcePort;

const UNREAD_COUNT_PATH: &str = "/unread-announcements-count";
const ANNOUNCEMENTS_PATH: &str = "/announcements";
const IDENTITY_QUERY_PARAM: &str = "student_id";
const USER_AGENT: &str = concat!("noticeboard/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the announcement endpoints.
pub struct HttpAnnouncementSource {
    client: Client,
    base_url: String,
}

impl HttpAnnouncementSource {
    /// Creates client for `base_url` with the default timeout.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates client with a custom request timeout.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::unavailable(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        identity: &UserIdentity,
    ) -> Result<T, RemoteError> {
        let url = self.endpoint(path);

        let response = self
            .client
            .get(&url)
            .query(&[(IDENTITY_QUERY_PARAM, identity.as_str())])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, url = %url, "Failed to reach announcement API");
                if e.is_timeout() {
                    RemoteError::network("request timed out")
                } else if e.is_connect() {
                    RemoteError::network("failed to connect")
                } else {
                    RemoteError::network(e.to_string())
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            return Err(Self::handle_error_response(status, response).await);
        }

        response.json::<T>().await.map_err(|e| {
            warn!(error = %e, url = %url, "Failed to parse response");
            RemoteError::malformed(e.to_string())
        })
    }

    async fn handle_error_response(status: StatusCode, response: reqwest::Response) -> RemoteError {
        let message = match response.json::<ErrorResponse>().await {
            Ok(error) => error.message,
            Err(_) => format!("HTTP {status}"),
        };

        match status {
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
                RemoteError::unavailable(format!("announcement API unavailable: {message}"))
            }
            _ => RemoteError::server(status.as_u16(), message),
        }
    }
}

#[async_trait]
impl AnnouncementSourcePort for HttpAnnouncementSource {
    async fn fetch_unread_count(&self, identity: &UserIdentity) -> Result<i64, RemoteError> {
        debug!(identity = %identity, "Fetching unread announcement count");

        let body: UnreadCountResponse = self.get_json(UNREAD_COUNT_PATH, identity).await?;

        debug!(identity = %identity, count = body.count, "Fetched unread count");
        Ok(body.count)
    }

    async fn fetch_announcements(
        &self,
        identity: &UserIdentity,
    ) -> Result<Vec<Announcement>, RemoteError> {
        debug!(identity = %identity, "Fetching announcements");

        let body: AnnouncementsResponse = self.get_json(ANNOUNCEMENTS_PATH, identity).await?;
        let announcements = body.into_announcements();

        debug!(identity = %identity, count = announcements.len(), "Fetched announcements");
        Ok(announcements)
    }
}
