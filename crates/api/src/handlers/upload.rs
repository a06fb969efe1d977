//! File upload function.
//!
//! Accepts `{ "file": <base64>, "fileName": ..., "fileType": ... }`, decodes
//! the payload and relays it to the storage service as multipart form data.
//! Answers `{ "url": ..., "filename": ... }`.

use axum::http::StatusCode;
use dubsite_core::error::CoreError;
use dubsite_core::upload::{self, UploadRequest};
use serde_json::json;

use super::{from_body, parse_json_body};
use crate::error::{AppError, AppResult};
use crate::invocation::{HttpMethod, Invocation, InvocationResponse};
use crate::state::AppState;

/// Methods advertised by the upload preflight.
pub const UPLOAD_ALLOW_METHODS: &str = "POST, OPTIONS";
/// Request headers advertised by the upload preflight.
pub const UPLOAD_ALLOW_HEADERS: &str = "Content-Type";

/// Error returned when the request carries no payload.
pub const NO_FILE_MESSAGE: &str = "No file data provided";

/// Entry point for the upload function.
pub async fn handle(state: &AppState, invocation: Invocation) -> InvocationResponse {
    let result = match invocation.method() {
        HttpMethod::Options => Ok(InvocationResponse::preflight(
            UPLOAD_ALLOW_METHODS,
            UPLOAD_ALLOW_HEADERS,
        )),
        HttpMethod::Post => upload_file(state, &invocation).await,
        other => Err(CoreError::MethodNotAllowed(other.as_str().to_string()).into()),
    };

    result.unwrap_or_else(AppError::into_invocation_response)
}

async fn upload_file(state: &AppState, invocation: &Invocation) -> AppResult<InvocationResponse> {
    let request: UploadRequest = from_body(parse_json_body(invocation)?)?;

    let Some(payload) = request.payload() else {
        return Err(AppError::BadRequest(NO_FILE_MESSAGE.into()));
    };

    let prepared = upload::prepare(payload, request.file_name(), request.file_type())?;
    let filename = prepared.filename.clone();
    let size = prepared.bytes.len();

    let receipt = state.storage.upload(prepared).await?;

    let url = match receipt.url {
        Some(url) => url,
        None => {
            tracing::debug!(%filename, "Storage reply has no url, using CDN fallback");
            upload::fallback_url(&state.config.storage.cdn_prefix, &filename)
        }
    };

    tracing::info!(%filename, size, %url, "File uploaded");

    Ok(InvocationResponse::json(
        StatusCode::OK,
        &json!({ "url": url, "filename": filename }),
    ))
}
