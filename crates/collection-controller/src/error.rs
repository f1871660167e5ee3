//! Classified Errors
//!
//! Every failure the controller can observe, classified by origin.

use thiserror::Error;

use crate::types::{Generation, ItemId};

/// Errors produced by transport calls, decoding and local mutation checks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifiedError {
    /// Transport unreachable or timed out
    #[error("network error: {0}")]
    Network(String),
    /// Server answered with a failure status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// Mutation target is not part of the current view
    #[error("item {0} is not in the current view")]
    NotFound(ItemId),
    /// A fetch result was superseded by a newer fetch. Logged, never shown.
    #[error("result of generation {generation} superseded by generation {current}")]
    StaleDiscard {
        generation: Generation,
        current: Generation,
    },
    /// Response body does not match the configured envelope
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ClassifiedError {
    /// Build an HTTP error, pulling the server's message out of a JSON body when present.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                ["message", "error"]
                    .iter()
                    .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_owned))
            })
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    format!("request failed with status {status}")
                } else {
                    trimmed.to_owned()
                }
            });
        ClassifiedError::Http { status, message }
    }

    /// Text suitable for an alert toast
    pub fn user_message(&self) -> String {
        match self {
            ClassifiedError::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            ClassifiedError::Http { status, message } if *status >= 500 => {
                format!("Server error ({status}): {message}")
            }
            ClassifiedError::Http { message, .. } => message.clone(),
            ClassifiedError::NotFound(id) => format!("Item {id} is no longer displayed."),
            ClassifiedError::StaleDiscard { .. } => String::new(),
            ClassifiedError::Decode(_) => "The server sent an unexpected response.".to_string(),
        }
    }

    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ClassifiedError::Network(_) => true,
            ClassifiedError::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Errors raised while loading a collection configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid collection config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid collection config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_reads_message_field() {
        let err = ClassifiedError::from_status(422, r#"{"message":"Amount must be positive"}"#);
        assert_eq!(
            err,
            ClassifiedError::Http {
                status: 422,
                message: "Amount must be positive".to_string()
            }
        );
        assert_eq!(err.user_message(), "Amount must be positive");
    }

    #[test]
    fn test_from_status_falls_back_to_error_field_and_raw_body() {
        let err = ClassifiedError::from_status(403, r#"{"error":"Forbidden"}"#);
        assert!(matches!(err, ClassifiedError::Http { ref message, .. } if message == "Forbidden"));

        let err = ClassifiedError::from_status(502, "Bad Gateway");
        assert!(matches!(err, ClassifiedError::Http { ref message, .. } if message == "Bad Gateway"));

        let err = ClassifiedError::from_status(500, "");
        assert_eq!(err.user_message(), "Server error (500): request failed with status 500");
    }

    #[test]
    fn test_transient_classification() {
        assert!(ClassifiedError::Network("timeout".into()).is_transient());
        assert!(ClassifiedError::from_status(503, "").is_transient());
        assert!(!ClassifiedError::from_status(404, "").is_transient());
        assert!(!ClassifiedError::NotFound(ItemId::from("N1")).is_transient());
    }
}
