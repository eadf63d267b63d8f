//! Error handling for the inventory console client
//!
//! Every failure a caller can see maps to one variant with a stable code and
//! a message fit for showing to the user.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use shared::ValidationError;

/// Shown when the service gives no usable detail or never answered
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Shown for a 401 that carries no detail
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    /// Caught before any request was sent
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The service answered 401. `message` is its `detail`, when given.
    #[error("Unauthorized: {}", unauthorized_text(.message))]
    Unauthorized { message: Option<String> },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// No response: connection refused, timeout, TLS failure
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Token storage error: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::Validation(err) => err.code(),
            ClientError::Unauthorized { .. } => "UNAUTHORIZED",
            ClientError::Api { .. } => "API_ERROR",
            ClientError::Network(_) => "NETWORK_ERROR",
            ClientError::Decode(_) => "DECODE_ERROR",
            ClientError::Config(_) => "CONFIGURATION_ERROR",
            ClientError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Message for a transient notification
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(err) => err.to_string(),
            ClientError::Unauthorized { message } => message
                .clone()
                .unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string()),
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Network(_) | ClientError::Decode(_) => GENERIC_ERROR_MESSAGE.to_string(),
            ClientError::Config(msg) => format!("Configuration error: {}", msg),
            ClientError::Storage(msg) => format!("Could not access the saved session: {}", msg),
        }
    }

    /// Build an API error from a non-success status and its raw body
    pub fn from_response(status: u16, body: &str) -> Self {
        if status == 401 {
            return ClientError::Unauthorized {
                message: detail_message(body),
            };
        }
        ClientError::Api {
            status,
            message: detail_message(body).unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized { .. })
    }
}

fn unauthorized_text(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or("session expired, please log in again")
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        ClientError::Config(err.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Value,
}

/// Pull a readable message out of the service's `detail` field.
///
/// A string detail is used verbatim. A list of field errors is joined into
/// one line. Anything else yields `None`.
pub fn detail_message(body: &str) -> Option<String> {
    let body: ErrorBody = serde_json::from_str(body).ok()?;
    match body.detail {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(field_error).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        _ => None,
    }
}

fn field_error(item: &Value) -> Option<String> {
    let msg = item.get("msg")?.as_str()?;
    // loc is ["body", "field", ...]; the request part is noise
    let field = item
        .get("loc")
        .and_then(Value::as_array)
        .and_then(|loc| loc.iter().rev().find_map(|p| p.as_str().filter(|s| *s != "body")))
        .map(str::to_string);
    Some(match field {
        Some(field) => format!("{}: {}", field, msg),
        None => msg.to_string(),
    })
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
