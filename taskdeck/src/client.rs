//! HTTP client for the remote task store.
//!
//! Thin reqwest wrapper over the store's REST contract. Each method maps to
//! one store operation; non-2xx responses become [`StoreError::Status`] with
//! the store's error message when one is present in the body.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use taskdeck_proto::{CreateTask, Task, TaskId, UpdateTask};
use url::Url;

/// Errors produced by store requests.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The configured store base URL is invalid.
    #[error("invalid store URL: {0}")]
    Url(#[from] url::ParseError),

    /// The request could not be sent or the response body not read.
    #[error("store request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store returned {status}: {message}")]
    Status {
        /// HTTP status code of the response.
        status: StatusCode,
        /// Error message from the response body, or the canonical reason.
        message: String,
    },
}

impl StoreError {
    /// Returns the HTTP status code for status errors.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client for the remote task store's `/tasks` resource.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: Client,
    base_url: Url,
}

impl StoreClient {
    /// Creates a client for the store at `base_url`.
    ///
    /// A missing trailing slash on the base URL is tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the URL does not parse or the underlying
    /// HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;
        let http = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { http, base_url })
    }

    /// Fetches all tasks in store order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failure or a non-2xx response.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let url = self.base_url.join("tasks")?;
        let response = self.http.get(url).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Creates a task from the given title, returning the authoritative
    /// task with the store-assigned id and creation timestamp.
    ///
    /// The title is sent verbatim; the store performs validation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failure or a non-2xx response.
    pub async fn create_task(&self, title: &str) -> Result<Task, StoreError> {
        let url = self.base_url.join("tasks")?;
        let body = CreateTask {
            title: title.to_string(),
        };
        let response = self.http.post(url).json(&body).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Replaces the title of the task with the given id.
    ///
    /// The response body is ignored beyond the status check; the caller
    /// re-derives the new local state itself.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failure or a non-2xx response.
    pub async fn update_task(&self, id: &TaskId, title: &str) -> Result<(), StoreError> {
        let url = self.base_url.join(&format!("tasks/{id}"))?;
        let body = UpdateTask {
            title: title.to_string(),
        };
        let response = self.http.put(url).json(&body).send().await?;
        check_status(response).await?;
        Ok(())
    }

    /// Deletes the task with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failure or a non-2xx response.
    pub async fn delete_task(&self, id: &TaskId) -> Result<(), StoreError> {
        let url = self.base_url.join(&format!("tasks/{id}"))?;
        let response = self.http.delete(url).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Maps a non-success response to [`StoreError::Status`], extracting the
/// store's `{"error": ...}` message when the body carries one.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
    Err(StoreError::Status { status, message })
}
