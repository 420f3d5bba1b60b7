//! Client-side error taxonomy.
//!
//! Every failure a component can surface falls into one of four kinds:
//! validation failures detected before any network call, missing-identity
//! failures, structured server rejections, and transport failures with no
//! usable response. Superseded completions (stale page responses, stale
//! thumbnail captures) are *not* errors -- they are dropped silently and
//! logged at `debug` by whoever discards them.

/// Generic message shown when a request fails without a structured body.
pub const COMMUNICATION_FAILURE: &str = "communication with the server failed";

/// A failure surfaced to the user by one of the client components.
///
/// Each variant is terminal for the triggering call only; the owning
/// state machine always lands in a state that permits an explicit retry.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// Detected client-side before any network call. Never sent to the
    /// server; also covers ownership-gate rejections on comment mutation.
    #[error("{0}")]
    Validation(String),

    /// An action requiring identity was attempted without one. The
    /// action is not attempted.
    #[error("sign-in is required for this action")]
    AuthRequired,

    /// A completed request returned a non-success status with a
    /// structured message, surfaced verbatim.
    #[error("server rejected the request ({status}): {message}")]
    Server { status: u16, message: String },

    /// The request could not complete at all.
    #[error("{COMMUNICATION_FAILURE}: {0}")]
    Network(String),
}

impl ClientError {
    /// Build a validation error from any displayable message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True for errors that never involved the network.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::AuthRequired)
    }

    /// The human-readable message for inline display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::AuthRequired => self.to_string(),
            Self::Server { message, .. } => message.clone(),
            Self::Network(_) => COMMUNICATION_FAILURE.to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_and_auth_are_local() {
        assert!(ClientError::validation("empty title").is_local());
        assert!(ClientError::AuthRequired.is_local());
        assert!(!ClientError::Network("refused".into()).is_local());
        assert!(!ClientError::Server {
            status: 500,
            message: "boom".into()
        }
        .is_local());
    }

    #[test]
    fn server_message_surfaced_verbatim() {
        let err = ClientError::Server {
            status: 413,
            message: "file too large".into(),
        };
        assert_eq!(err.user_message(), "file too large");
    }

    #[test]
    fn network_message_is_generic() {
        let err = ClientError::Network("connection reset by peer".into());
        assert_eq!(err.user_message(), COMMUNICATION_FAILURE);
    }
}
