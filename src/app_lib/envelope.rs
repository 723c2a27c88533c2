//! The backend wraps every payload in a uniform envelope:
//! `{success, code, message, data, errors, request_id, error_id, timestamp}`.
//! Successful envelopes are unwrapped to `data`; failed ones become typed
//! errors so callers never inspect raw bodies.

use super::errors::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

/// Business code: the HTTP status on success, an `E001001`-style string on errors.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ApiCode {
    Number(i64),
    Text(String),
}

impl fmt::Display for ApiCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(code) => write!(f, "{code}"),
            Self::Text(code) => f.write_str(code),
        }
    }
}

/// Failure details extracted from an error envelope.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiFailure {
    pub code: Option<ApiCode>,
    pub message: String,
    /// Field-level validation errors, as sent by the backend.
    pub errors: Option<Value>,
    pub request_id: Option<String>,
    pub error_id: Option<String>,
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl ApiFailure {
    /// Builds a failure from a (possibly missing or non-JSON) error body.
    /// The message is taken from `message`, then `error`, then `fallback_text`,
    /// then `default_message`.
    #[must_use]
    pub fn from_body(body: Option<&Value>, fallback_text: &str, default_message: &str) -> Self {
        let text = |key: &str| {
            body.and_then(|value| value.get(key))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToString::to_string)
        };

        let message = text("message")
            .or_else(|| text("error"))
            .or_else(|| {
                if body.is_none() {
                    sanitize_body(fallback_text)
                } else {
                    None
                }
            })
            .unwrap_or_else(|| default_message.to_string());

        Self {
            code: body
                .and_then(|value| value.get("code"))
                .and_then(|code| serde_json::from_value(code.clone()).ok()),
            message,
            errors: body
                .and_then(|value| value.get("errors"))
                .filter(|errors| !errors.is_null())
                .cloned(),
            request_id: text("request_id"),
            error_id: text("error_id"),
        }
    }
}

/// Unwraps a 2xx response body.
///
/// # Errors
/// Returns `AppError::Business` when the envelope reports `success: false`.
pub fn unwrap_envelope(body: Value) -> Result<Value, AppError> {
    let success = match body.as_object().and_then(|object| object.get("success")) {
        Some(flag) => flag.as_bool().unwrap_or(false),
        None => return Ok(body),
    };

    if success {
        match body {
            Value::Object(mut object) if object.contains_key("data") => {
                Ok(object.remove("data").unwrap_or(Value::Null))
            }
            other => Ok(other),
        }
    } else {
        Err(AppError::Business(ApiFailure::from_body(
            Some(&body),
            "",
            "Operation failed",
        )))
    }
}

/// Trims and truncates a raw body for user-facing messages.
#[must_use]
pub fn sanitize_body(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(MAX_ERROR_CHARS).collect())
    }
}

/// Paginated listing. User and department endpoints report `page`/`pages`,
/// role endpoints report `next`/`previous` links.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub count: u64,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

impl<T> Page<T> {
    /// True when the backend indicates that more results follow this page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        if self.next.is_some() {
            return true;
        }
        match (self.page, self.pages) {
            (Some(page), Some(pages)) => page < pages,
            _ => false,
        }
    }
}
