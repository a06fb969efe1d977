//! Client for the external file storage service.
//!
//! Uploads go out as a single `multipart/form-data` POST with one part named
//! `file`, using [`reqwest::multipart`]. The service answers with JSON that
//! usually carries the public `url` of the stored file.

use std::time::Duration;

use async_trait::async_trait;
use dubsite_core::upload::PreparedUpload;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

/// Name of the multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// Default upload timeout. Payloads are often full video episodes.
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Errors from the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The storage service returned a non-2xx status code.
    #[error("Storage API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// What the storage service reported about a stored file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Public URL, when the service included one.
    #[serde(default)]
    pub url: Option<String>,
}

/// Somewhere uploaded files can be sent.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn upload(&self, file: PreparedUpload) -> Result<UploadReceipt, StorageError>;
}

/// HTTP client for the storage upload endpoint.
pub struct StorageClient {
    client: reqwest::Client,
    upload_url: String,
}

impl StorageClient {
    /// Create a client with its own connection pool and the given timeout.
    pub fn new(upload_url: impl Into<String>, timeout: Duration) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, upload_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, upload_url: impl Into<String>) -> Self {
        Self {
            client,
            upload_url: upload_url.into(),
        }
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, capturing the body
    /// otherwise.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, StorageError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StorageError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Build the single-part form for `file`.
///
/// The boundary is generated by reqwest. Every part has a known length, so
/// the request goes out with an exact `Content-Length`.
pub fn build_form(file: PreparedUpload) -> Result<Form, StorageError> {
    let part = Part::bytes(file.bytes)
        .file_name(file.filename)
        .mime_str(&file.content_type)?;
    Ok(Form::new().part(FILE_FIELD, part))
}

#[async_trait]
impl StorageBackend for StorageClient {
    async fn upload(&self, file: PreparedUpload) -> Result<UploadReceipt, StorageError> {
        let size = file.bytes.len();
        let filename = file.filename.clone();
        let form = build_form(file)?;

        tracing::debug!(%filename, size, url = %self.upload_url, "Sending file to storage");

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        Ok(response.json::<UploadReceipt>().await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
