//! Error types for the ShowMaster client.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ShowMasterError>;

/// A missing or malformed field, detected before any network call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Name of the offending field (wire name, e.g. `showId`)
    pub field: String,
    /// Human-readable explanation
    pub message: String,
}

impl ValidationError {
    /// Create a validation error for a field.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Field is required but was left empty.
    #[must_use]
    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, "is required")
    }

    /// Field holds a value that cannot be parsed.
    #[must_use]
    pub fn invalid(field: impl Into<String>, value: &str) -> Self {
        Self::new(field, format!("invalid value '{value}'"))
    }
}

/// Error taxonomy for every user-triggered action.
///
/// Every variant is surfaced to the user at the point of the triggering
/// action; none is fatal to a running session.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShowMasterError {
    // ═══════════════════════════════════════════════════════════
    // Local errors (no network call was made)
    // ═══════════════════════════════════════════════════════════

    /// Required field missing or invalid.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A submission from the same form or flow is still in flight.
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// Durable token storage could not be read or written.
    #[error("Token storage error: {0}")]
    Storage(String),

    // ═══════════════════════════════════════════════════════════
    // Remote errors
    // ═══════════════════════════════════════════════════════════

    /// The backend rejected the credentials (HTTP 401).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Any other non-2xx response or transport failure.
    #[error("{message}")]
    Remote {
        /// HTTP status, `None` for transport failures
        status: Option<u16>,
        /// Message passed through from the response body or transport layer
        message: String,
    },

    /// The response did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ShowMasterError {
    /// Shorthand for a local validation failure.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::new(field, message))
    }

    /// Whether the error came from the remote layer (and may be transient).
    ///
    /// Only these are eligible for the catalog read retries.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. } | Self::Decode(_))
    }

    /// Whether the backend rejected the credentials.
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_field() {
        let err = ShowMasterError::from(ValidationError::required("seatNos"));
        assert_eq!(err.to_string(), "Validation failed: seatNos: is required");
    }

    #[test]
    fn remote_error_message_is_verbatim() {
        let err = ShowMasterError::Remote {
            status: Some(400),
            message: "Requested seats are not available".to_string(),
        };
        assert_eq!(err.to_string(), "Requested seats are not available");
        assert!(err.is_remote());
        assert!(!err.is_authentication());
    }

    #[test]
    fn local_errors_are_not_remote() {
        assert!(!ShowMasterError::SubmissionInFlight.is_remote());
        assert!(!ShowMasterError::validation("showId", "is required").is_remote());
        assert!(ShowMasterError::Authentication("expired".into()).is_authentication());
    }
}
