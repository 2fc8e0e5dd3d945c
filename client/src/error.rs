//! Error types for the REST client

use showmaster_core::ShowMasterError;
use thiserror::Error;

/// Errors that can occur when talking to the booking backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, TLS)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// HTTP 401
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-2xx status
    #[error("API error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// A 2xx response whose body did not have the expected shape
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),
}

impl From<ApiError> for ShowMasterError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized(message) => Self::Authentication(message),
            ApiError::Status { status, message } => Self::Remote {
                status: Some(status),
                message,
            },
            ApiError::RequestFailed(message) => Self::Remote {
                status: None,
                message,
            },
            ApiError::ResponseParseFailed(message) => Self::Decode(message),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed(err.to_string())
    }
}

/// Pull a human-readable message out of an error body.
///
/// Plain-text bodies are used as-is; JSON error documents contribute their
/// `message` (or `error`) field.
pub(crate) fn error_message(body: &str, fallback: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return fallback.to_string();
    }
    if let Ok(serde_json::Value::Object(doc)) = serde_json::from_str(trimmed) {
        for key in ["message", "error"] {
            if let Some(text) = doc.get(key).and_then(serde_json::Value::as_str) {
                if !text.trim().is_empty() {
                    return text.trim().to_string();
                }
            }
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_authentication() {
        let err: ShowMasterError = ApiError::Unauthorized("expired".into()).into();
        assert!(err.is_authentication());
    }

    #[test]
    fn transport_failure_has_no_status() {
        let err: ShowMasterError = ApiError::RequestFailed("connection refused".into()).into();
        assert_eq!(
            err,
            ShowMasterError::Remote {
                status: None,
                message: "connection refused".into()
            }
        );
    }

    #[test]
    fn error_message_prefers_json_message() {
        assert_eq!(
            error_message(r#"{"status":400,"error":"Bad Request","message":"Seat A1 taken"}"#, "x"),
            "Seat A1 taken"
        );
        assert_eq!(error_message("  Show not found \n", "x"), "Show not found");
        assert_eq!(error_message("", "Internal Server Error"), "Internal Server Error");
        assert_eq!(error_message(r#"{"error":"Forbidden"}"#, "x"), "Forbidden");
    }
}
