//! Client error types.
use thiserror::Error;

/// Failure of a single API round trip.
///
/// Callers branch on the variant: [`ApiError::Unauthorized`] means the session
/// must be re-established, everything else is reported and may be retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Session expired or rejected")]
    Unauthorized,

    #[error("{message} ({status})")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Attachment error: {0}")]
    Io(String),
}

impl ApiError {
    /// Whether the caller should drop the session and log in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// The message a user should see for this failure.
    ///
    /// Server-provided messages are shown verbatim; everything else uses the
    /// `Display` form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Message for a failed login or signup attempt.
    ///
    /// Server messages win; transport failures read as a connection problem;
    /// anything else falls back to `fallback`.
    pub fn auth_message(&self, fallback: &str) -> String {
        match self {
            Self::Status { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Network(_) => crate::constants::CONNECTION_ERROR_MESSAGE.to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode(value.to_string())
        } else if value.is_builder() {
            Self::InvalidUrl(value.to_string())
        } else {
            Self::Network(value.to_string())
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

/// Failure reading or writing the persisted session.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session token is empty")]
    EmptyToken,
}

#[cfg(test)]
mod tests {
    use super::ApiError;

    #[test]
    fn only_unauthorized_requires_login() {
        assert!(ApiError::Unauthorized.requires_login());
        for err in [
            ApiError::Network("reset".to_string()),
            ApiError::Status {
                status: 500,
                message: "boom".to_string(),
            },
            ApiError::Decode("eof".to_string()),
        ] {
            assert!(!err.requires_login(), "{:?}", err);
        }
    }

    #[test]
    fn auth_message_distinguishes_server_and_transport_failures() {
        let rejected = ApiError::Status {
            status: 400,
            message: "User already exists".to_string(),
        };
        assert_eq!(rejected.auth_message("Signup failed"), "User already exists");
        assert_eq!(
            ApiError::Network("refused".to_string()).auth_message("Signup failed"),
            "Error connecting to server"
        );
        assert_eq!(
            ApiError::Decode("eof".to_string()).auth_message("Signup failed"),
            "Signup failed"
        );
    }

    #[test]
    fn user_message_prefers_server_message() {
        let err = ApiError::Status {
            status: 409,
            message: "User already exists".to_string(),
        };
        assert_eq!(err.user_message(), "User already exists");
        assert_eq!(err.to_string(), "User already exists (409)");
        assert_eq!(
            ApiError::Network("connection refused".to_string()).user_message(),
            "Network error: connection refused"
        );
    }
}
