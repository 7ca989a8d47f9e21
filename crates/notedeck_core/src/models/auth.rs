//! Authentication and summarization payloads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Email/password pair posted to `/signup` and `/login`.
#[derive(Clone, Serialize, PartialEq, Eq, Default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Reject blank fields before any request is made.
    ///
    /// # Errors
    /// Returns the message to show when a required field is empty.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.email.trim().is_empty() {
            return Err("Email is required");
        }
        if self.password.is_empty() {
            return Err("Password is required");
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful `/login` response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Body of `POST /summarize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub content: String,
}

/// Response of `POST /summarize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::Credentials;

    #[test]
    fn validate_requires_both_fields() {
        assert_eq!(
            Credentials::new("  ", "pw").validate(),
            Err("Email is required")
        );
        assert_eq!(
            Credentials::new("a@b.c", "").validate(),
            Err("Password is required")
        );
        assert!(Credentials::new("a@b.c", "pw").validate().is_ok());
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", Credentials::new("a@b.c", "hunter2"));
        assert!(rendered.contains("a@b.c"));
        assert!(!rendered.contains("hunter2"));
    }
}
