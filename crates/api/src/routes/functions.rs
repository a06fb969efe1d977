//! HTTP host for the function handlers.
//!
//! Each function is mounted at its own path and receives every method, so
//! the handler, not the router, decides what is allowed.
//!
//! ```text
//! ANY /news          -> handlers::news::handle
//! ANY /videos        -> handlers::videos::handle
//! ANY /upload-file   -> handlers::upload::handle
//! ```

use std::collections::HashMap;

use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::{HeaderMap, Method};
use axum::routing::any;
use axum::Router;

use crate::handlers::{news, upload, videos};
use crate::invocation::{Invocation, InvocationResponse};
use crate::state::AppState;

/// Largest accepted upload request. Base64 inflates files by a third.
pub const MAX_UPLOAD_BODY_BYTES: usize = 512 * 1024 * 1024;

async fn news_function(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> InvocationResponse {
    news::handle(&state, Invocation::from_http(&method, query, &headers, body)).await
}

async fn videos_function(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> InvocationResponse {
    videos::handle(&state, Invocation::from_http(&method, query, &headers, body)).await
}

async fn upload_function(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> InvocationResponse {
    upload::handle(&state, Invocation::from_http(&method, query, &headers, body)).await
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/news", any(news_function))
        .route("/videos", any(videos_function))
        .route(
            "/upload-file",
            any(upload_function).layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES)),
        )
}
