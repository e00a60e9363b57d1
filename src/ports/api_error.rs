//! Errors produced by the remote API ports.

/// Failure of a remote users/workouts call.
///
/// Every variant renders as a single human-readable message; no variant
/// carries a machine-readable code beyond the HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// The service answered with a non-success status.
    #[error("{}", status_message(*status, message))]
    Status {
        /// HTTP status code.
        status: u16,
        /// Detail taken from the service's error body, possibly empty.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("could not decode response: {0}")]
    Decode(String),

    /// An id-producing endpoint succeeded without returning an id.
    #[error("Missing id in {action} response")]
    MissingId {
        /// Repository operation that expected the id.
        action: &'static str,
    },

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

fn status_message(status: u16, message: &str) -> String {
    if message.trim().is_empty() {
        format!("HTTP {}", status)
    } else {
        message.to_string()
    }
}

impl ApiError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a status error.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Creates a missing-id error for the given operation.
    pub fn missing_id(action: &'static str) -> Self {
        Self::MissingId { action }
    }

    /// HTTP status of the failure, if the service answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for HTTP 403; the UI stays silent about these.
    pub fn is_forbidden(&self) -> bool {
        self.status_code() == Some(403)
    }

    /// Message to show the user, or `fallback` when the error carries none.
    pub fn user_message(&self, fallback: &str) -> String {
        let carries_message = match self {
            Self::Network(message) | Self::Decode(message) | Self::InvalidRequest(message) => {
                !message.trim().is_empty()
            }
            Self::Status { message, .. } => !message.trim().is_empty(),
            Self::Timeout { .. } | Self::MissingId { .. } => true,
        };

        if carries_message {
            self.to_string()
        } else {
            fallback.to_string()
        }
    }
}
