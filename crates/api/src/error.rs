//! Errors from the backend REST layer.

use ddw_core::error::{ClientError, COMMUNICATION_FAILURE};

/// Fallback when a non-success response carries no structured message.
const UNKNOWN_SERVER_ERROR: &str = "an unknown error occurred";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (connect, DNS, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the structured error body.
        message: String,
    },
}

impl From<ApiError> for ClientError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Request(e) => ClientError::Network(e.to_string()),
            ApiError::Api { status, message } => ClientError::Server { status, message },
        }
    }
}

/// Pull the human-readable message out of an error body.
///
/// The backend reports failures under `error` or `msg`; the verification
/// endpoint reuses `watermark` for rejection reasons. A body that parses
/// as none of these maps to a fixed unknown-error message, and a body
/// that is not JSON at all maps to the generic communication failure.
pub fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return COMMUNICATION_FAILURE.to_string();
    };
    for key in ["error", "msg", "watermark"] {
        if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
            if !message.is_empty() {
                return message.to_string();
            }
        }
    }
    UNKNOWN_SERVER_ERROR.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_error_field() {
        let msg = extract_error_message(r#"{"error":"title is required","msg":"other"}"#);
        assert_eq!(msg, "title is required");
    }

    #[test]
    fn falls_back_to_msg_then_watermark() {
        assert_eq!(extract_error_message(r#"{"msg":"token expired"}"#), "token expired");
        assert_eq!(
            extract_error_message(r#"{"watermark":"no watermark found"}"#),
            "no watermark found"
        );
    }

    #[test]
    fn unstructured_body_maps_to_generic_failure() {
        assert_eq!(extract_error_message("<html>502</html>"), COMMUNICATION_FAILURE);
        assert_eq!(extract_error_message(r#"{"detail":42}"#), UNKNOWN_SERVER_ERROR);
    }
}
