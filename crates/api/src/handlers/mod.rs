//! Function handlers.
//!
//! Each submodule exposes `handle(&AppState, Invocation) -> InvocationResponse`
//! and dispatches on the method: OPTIONS answers the preflight without
//! touching any backend, known methods run their operation, anything else
//! is a 405. Errors never escape a handler; they are rendered by
//! [`AppError::into_invocation_response`].

pub mod news;
pub mod upload;
pub mod videos;

use dubsite_core::types::DbId;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::invocation::Invocation;

/// Methods advertised by the content handlers' preflight.
pub const CONTENT_ALLOW_METHODS: &str = "GET, POST, DELETE, OPTIONS";
/// Request headers advertised by the content handlers' preflight.
pub const CONTENT_ALLOW_HEADERS: &str = "Content-Type, X-Admin-Password";

/// Body field carrying the admin password on POST.
pub const PASSWORD_BODY_FIELD: &str = "admin_password";
/// Query parameter carrying the admin password on DELETE.
pub const PASSWORD_QUERY_PARAM: &str = "password";
/// Query parameter naming the row to delete.
pub const ID_QUERY_PARAM: &str = "id";

/// Parse the body as JSON. An absent or blank body reads as `{}`.
pub(crate) fn parse_json_body(invocation: &Invocation) -> AppResult<Value> {
    let body = invocation.body();
    if body.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))
}

/// The admin password from a JSON body, if it is a string.
pub(crate) fn body_password(body: &Value) -> Option<&str> {
    body.get(PASSWORD_BODY_FIELD).and_then(Value::as_str)
}

/// Deserialize a request DTO from an already-parsed body.
pub(crate) fn from_body<T: serde::de::DeserializeOwned>(body: Value) -> AppResult<T> {
    serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))
}

/// The target id from the query string.
///
/// `None` when the parameter is absent or blank; a non-numeric value is a
/// bad request.
pub(crate) fn query_id(invocation: &Invocation) -> AppResult<Option<DbId>> {
    match invocation.query(ID_QUERY_PARAM).map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<DbId>()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Invalid id: {raw}"))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
