//! JSON request/response helpers for axum handlers.
//!
//! Decoding is strict by default: a bounded body, exactly one JSON value,
//! and no keys the target type does not know about. Every failure maps to a
//! short client-facing message.

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Body limit applied when the caller passes `0`.
pub const DEFAULT_MAX_BYTES: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("body contains malformed JSON at line {line} column {column}")]
    Malformed { line: usize, column: usize },

    #[error("body contains malformed JSON")]
    Truncated,

    #[error("body contains incorrect JSON type: {0}")]
    IncorrectType(String),

    #[error("body must not be empty")]
    Empty,

    #[error("body contains unknown key \"{0}\"")]
    UnknownKey(String),

    #[error("body must not be larger than {0} bytes")]
    TooLarge(usize),

    #[error("body must contain only one JSON value")]
    MultipleValues,

    #[error("failed to read request body: {0}")]
    Body(String),

    #[error("failed to encode JSON: {0}")]
    Encode(String),

    #[error("remote request failed: {0}")]
    Remote(#[from] reqwest::Error),
}

impl JsonError {
    /// True when the client sent something undecodable.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Encode(_) | Self::Remote(_))
    }
}

/// Standard envelope for JSON responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonResponse<T = Value> {
    pub error: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> JsonResponse<T> {
    pub fn ok(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            error: false,
            message: message.into(),
            data,
        }
    }
}

/// Read at most `max_bytes` of `body` and decode exactly one `T` from it.
///
/// With `allow_unknown_fields` off, any key `T` does not declare is
/// rejected, at any nesting depth.
pub async fn read_json<T>(body: Body, max_bytes: usize, allow_unknown_fields: bool) -> Result<T, JsonError>
where
    T: DeserializeOwned,
{
    let max_bytes = if max_bytes == 0 { DEFAULT_MAX_BYTES } else { max_bytes };

    let mut stream = body.into_data_stream();
    let mut buf = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| JsonError::Body(e.to_string()))?;
        if buf.len() + chunk.len() > max_bytes {
            return Err(JsonError::TooLarge(max_bytes));
        }
        buf.extend_from_slice(&chunk);
    }

    decode_json(&buf, allow_unknown_fields)
}

/// Decode one `T` from an in-memory body with the same rules as [`read_json`].
pub fn decode_json<T>(bytes: &[u8], allow_unknown_fields: bool) -> Result<T, JsonError>
where
    T: DeserializeOwned,
{
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(JsonError::Empty);
    }

    let mut de = serde_json::Deserializer::from_slice(bytes);
    let mut unknown = None;
    let value = if allow_unknown_fields {
        T::deserialize(&mut de)
    } else {
        serde_ignored::deserialize(&mut de, |path| {
            unknown.get_or_insert_with(|| path.to_string());
        })
    }
    .map_err(classify)?;
    de.end().map_err(|_| JsonError::MultipleValues)?;

    match unknown {
        Some(key) => Err(JsonError::UnknownKey(key)),
        None => Ok(value),
    }
}

fn classify(err: serde_json::Error) -> JsonError {
    match err.classify() {
        Category::Syntax => JsonError::Malformed {
            line: err.line(),
            column: err.column(),
        },
        Category::Eof => JsonError::Truncated,
        Category::Data => JsonError::IncorrectType(err.to_string()),
        Category::Io => JsonError::Body(err.to_string()),
    }
}

/// Serialize `value` as the response body with `status`.
///
/// Extra `headers` are applied first; `Content-Type` is always
/// `application/json`.
pub fn write_json<T: Serialize>(
    status: StatusCode,
    value: &T,
    headers: Option<HeaderMap>,
) -> Result<Response, JsonError> {
    let body = serde_json::to_vec(value).map_err(|e| JsonError::Encode(e.to_string()))?;

    let mut response = (status, body).into_response();
    if let Some(extra) = headers {
        response.headers_mut().extend(extra);
    }
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(response)
}

/// `{"error": true, "message": err}` with `status` (400 when `None`).
pub fn error_json(err: &dyn std::fmt::Display, status: Option<StatusCode>) -> Response {
    let status = status.unwrap_or(StatusCode::BAD_REQUEST);
    let payload: JsonResponse = JsonResponse {
        error: true,
        message: err.to_string(),
        data: None,
    };
    match write_json(status, &payload, None) {
        Ok(response) => response,
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// POST `value` as JSON to `uri`, returning the remote status and response.
///
/// A fresh client is built when `client` is `None`.
pub async fn push_json_to_remote<T: Serialize + ?Sized>(
    uri: &str,
    value: &T,
    client: Option<&reqwest::Client>,
) -> Result<(StatusCode, reqwest::Response), JsonError> {
    let owned;
    let client = match client {
        Some(c) => c,
        None => {
            owned = reqwest::Client::new();
            &owned
        }
    };

    let response = client.post(uri).json(value).send().await?;
    let status = response.status();
    debug!(uri, status = status.as_u16(), "Pushed JSON to remote");
    Ok((status, response))
}
