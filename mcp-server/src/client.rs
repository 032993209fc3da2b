//! HTTP client for the Folio API
//!
//! Requests the plain-text rendering of feeds; that is what the tools hand
//! back to the model.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: StatusCode, body: String },

    #[error("Response did not include a session id")]
    MissingSession,
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// HTTP client for communicating with the Folio API
#[derive(Clone)]
pub struct FolioClient {
    client: reqwest::Client,
    base_url: String,
}

impl FolioClient {
    /// Create a new client from environment variables
    ///
    /// Optional env vars:
    /// - FOLIO_API_URL: Base URL of the API (default http://localhost:8080)
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("FOLIO_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());

        Self::new(&base_url)
    }

    /// Create a new client with explicit configuration
    pub fn new(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/plain"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Open a feed session; returns the session id and the first page
    pub async fn open_feed(&self) -> Result<(String, String)> {
        let text = self.post_text("/feeds").await?;
        let session_id = parse_session_header(&text)
            .ok_or(ClientError::MissingSession)?
            .to_string();
        Ok((session_id, text))
    }

    /// Current view of a session
    pub async fn view_feed(&self, session_id: &str) -> Result<String> {
        self.get_text(&format!("/feeds/{}", session_id)).await
    }

    /// Report the end of the list as visible
    pub async fn load_more(&self, session_id: &str) -> Result<String> {
        self.post_text(&format!("/feeds/{}/more", session_id)).await
    }

    pub async fn refresh(&self, session_id: &str) -> Result<String> {
        self.post_text(&format!("/feeds/{}/refresh", session_id))
            .await
    }

    pub async fn close_feed(&self, session_id: &str) -> Result<()> {
        let url = format!("{}/feeds/{}", self.base_url, session_id);
        let response = self.client.delete(&url).send().await?;
        handle_text_response(response).await.map(|_| ())
    }

    // --- Internal helpers ---

    async fn get_text(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;

        handle_text_response(response).await
    }

    async fn post_text(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).send().await?;

        handle_text_response(response).await
    }
}

async fn handle_text_response(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ClientError::Api { status, body });
    }

    Ok(body)
}

/// Session id from the `Session: <id>` first line of an opened feed
fn parse_session_header(text: &str) -> Option<&str> {
    text.lines()
        .next()?
        .strip_prefix("Session:")
        .map(str::trim)
        .filter(|id| !id.is_empty())
}
