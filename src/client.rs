//! Client for the notebook backend API.
//!
//! The backend is an external collaborator speaking plain HTTP:
//!
//! - `GET {base}/api/notebooks` returns a JSON array of [`NotebookEntry`].
//! - `GET {base}/api/notebooks/{filename}` returns the notebook document.
//!
//! Each page view issues exactly one request; there is no retry, timeout, or
//! cancellation.

use std::env;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// The local development backend used when no base URL is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Environment variable overriding the backend base URL.
pub const API_BASE_VAR: &str = "NBVIEW_API_BASE";

/// Errors returned by the backend API client.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be sent, or the response body could not be
    /// read or parsed as JSON.
    #[error("request to notebook backend failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("notebook backend returned {0}")]
    Status(StatusCode),
}

/// An entry in the backend's notebook listing.
#[derive(Debug, Clone, Deserialize)]
pub struct NotebookEntry {
    /// Notebook file name, used as the key for the detail endpoint.
    pub filename: String,

    /// File size in bytes.
    #[serde(default)]
    pub size: u64,
}

/// Asynchronous client for the notebook backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for the backend at `base`, e.g.
    /// `http://localhost:8000`. A trailing slash is tolerated.
    pub fn new(base: impl Into<String>) -> ApiClient {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }

        ApiClient {
            base,
            http: reqwest::Client::new(),
        }
    }

    /// Creates a client from [`API_BASE_VAR`], falling back to
    /// [`DEFAULT_API_BASE`] when unset.
    pub fn from_env() -> ApiClient {
        let base = env::var(API_BASE_VAR).unwrap_or_else(|_| DEFAULT_API_BASE.to_owned());
        ApiClient::new(base)
    }

    /// The backend base URL, without a trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Fetches the notebook listing.
    pub async fn notebooks(&self) -> Result<Vec<NotebookEntry>, Error> {
        let url = format!("{}/api/notebooks", self.base);
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }

        Ok(response.json().await?)
    }

    /// Fetches one notebook document as raw JSON.
    ///
    /// The document is returned unparsed so that the caller can show it
    /// verbatim in the JSON view alongside the rendered cells.
    pub async fn notebook(&self, filename: &str) -> Result<Value, Error> {
        let url = format!("{}/api/notebooks/{}", self.base, filename);
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::ApiClient;

    #[test]
    fn trailing_slash_is_normalized() {
        let client = ApiClient::new("http://localhost:8000/");

        assert_eq!(client.base(), "http://localhost:8000");
    }
}
