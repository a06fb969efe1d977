//! Function invocation contract.
//!
//! Every handler is a function from [`Invocation`] to [`InvocationResponse`],
//! the same event/result shape a serverless function platform hands to a
//! function. The axum host in [`crate::routes::functions`] translates real
//! HTTP requests into this shape and back.

use std::collections::{BTreeMap, HashMap};

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Preflight cache lifetime advertised to browsers, in seconds.
pub const CORS_MAX_AGE_SECS: u32 = 86_400;

/// The HTTP methods a handler can branch on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Options,
    Get,
    Post,
    Delete,
    /// Anything else, kept verbatim for the 405 log line.
    Other(String),
}

impl HttpMethod {
    /// Method names are matched case-sensitively, like HTTP itself.
    pub fn parse(method: &str) -> Self {
        match method {
            "OPTIONS" => Self::Options,
            "GET" => Self::Get,
            "POST" => Self::Post,
            "DELETE" => Self::Delete,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Options => "OPTIONS",
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Other(method) => method,
        }
    }
}

fn default_method() -> String {
    "GET".into()
}

/// One inbound request as seen by a handler.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    #[serde(default = "default_method")]
    pub http_method: String,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
}

impl Invocation {
    pub fn new(http_method: impl Into<String>) -> Self {
        Self {
            http_method: http_method.into(),
            headers: None,
            query_string_parameters: None,
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Build an invocation from the parts of a real HTTP request.
    ///
    /// Header names are lower-cased; values that are not valid UTF-8 are
    /// dropped. An empty body becomes `None`.
    pub fn from_http(
        method: &Method,
        query: HashMap<String, String>,
        headers: &HeaderMap,
        body: String,
    ) -> Self {
        let headers = headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        Self {
            http_method: method.as_str().to_string(),
            headers: Some(headers),
            query_string_parameters: (!query.is_empty()).then_some(query),
            body: (!body.is_empty()).then_some(body),
        }
    }

    pub fn method(&self) -> HttpMethod {
        HttpMethod::parse(&self.http_method)
    }

    /// A query string parameter, if present.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(key))
            .map(String::as_str)
    }

    /// The raw body, with an absent body read as empty.
    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

/// A handler's result, ready to be returned to the platform or rendered as
/// an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl InvocationResponse {
    /// A JSON response carrying the standard CORS origin header.
    pub fn json<T: Serialize>(status: StatusCode, payload: &T) -> Self {
        match serde_json::to_string(payload) {
            Ok(body) => Self::json_text(status, body),
            Err(err) => {
                tracing::error!(error = %err, "Failed to serialize response body");
                Self::json_text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": format!("Serialization error: {err}") })
                        .to_string(),
                )
            }
        }
    }

    fn json_text(status: StatusCode, body: String) -> Self {
        let headers = BTreeMap::from([
            ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]);
        Self {
            status_code: status.as_u16(),
            headers,
            body,
            is_base64_encoded: false,
        }
    }

    /// Empty 200 answer to a CORS preflight.
    pub fn preflight(allow_methods: &str, allow_headers: &str) -> Self {
        let headers = BTreeMap::from([
            ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
            ("Access-Control-Allow-Methods".to_string(), allow_methods.to_string()),
            ("Access-Control-Allow-Headers".to_string(), allow_headers.to_string()),
            ("Access-Control-Max-Age".to_string(), CORS_MAX_AGE_SECS.to_string()),
        ]);
        Self {
            status_code: StatusCode::OK.as_u16(),
            headers,
            body: String::new(),
            is_base64_encoded: false,
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Parse the body as JSON.
    pub fn json_body(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

impl IntoResponse for InvocationResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            match (
                header::HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!(%name, "Dropping invalid response header"),
            }
        }
        response
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
