//! Client errors

use serde::Deserialize;
use thiserror::Error;

/// Client errors for billing API operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport error - the request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Authentication required - token missing or rejected.
    #[error("authentication required: {0}")]
    Unauthenticated(String),

    /// The API returned an error payload.
    ///
    /// The billing API reports failures as `{"error": message}` with a
    /// non-success status; `message` carries that payload when present.
    #[error("api error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the response body
        message: String,
    },

    /// Response body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Returns true if retrying the request could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Unauthenticated(_) | Self::InvalidResponse(_) => false,
        }
    }
}

/// Error payload shape used by the billing API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

impl ClientError {
    /// Build an API error from a response status and raw body, pulling the
    /// message out of the `{"error": ...}` payload when it parses.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| body.to_string());

        if status == 401 {
            return Self::Unauthenticated(message);
        }
        Self::Api { status, message }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_payload_message_extracted() {
        let err = ClientError::from_response(500, r#"{"error":"No Stripe customer found"}"#);
        assert!(matches!(
            err,
            ClientError::Api { status: 500, ref message } if message == "No Stripe customer found"
        ));
    }

    #[test]
    fn test_non_json_body_kept_verbatim() {
        let err = ClientError::from_response(502, "Bad Gateway");
        assert!(matches!(
            err,
            ClientError::Api { status: 502, ref message } if message == "Bad Gateway"
        ));
    }

    #[test]
    fn test_unauthorized_maps_to_unauthenticated() {
        let err = ClientError::from_response(401, r#"{"error":"invalid token"}"#);
        assert!(matches!(err, ClientError::Unauthenticated(_)));
    }

    #[test]
    fn test_retryable_errors() {
        assert!(ClientError::Timeout.is_retryable());
        assert!(ClientError::from_response(500, "{}").is_retryable());
        assert!(!ClientError::from_response(400, "{}").is_retryable());
        assert!(!ClientError::Unauthenticated("no token".to_string()).is_retryable());
    }
}
