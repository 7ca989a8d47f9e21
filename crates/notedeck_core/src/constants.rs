//! Shared constants used across NoteDeck crates.

use std::time::Duration;

/// Default base URL of the notes API.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// File name of the persisted session token.
pub const SESSION_FILE_NAME: &str = "token";

/// Idle time after the last search keystroke before a search request is sent.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(150);

/// Fallback shown when signup fails without a server message.
pub const SIGNUP_FAILED_MESSAGE: &str = "Signup failed";

/// Fallback shown when login fails without a server message.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";

/// Message shown for transport failures on the auth screens.
pub const CONNECTION_ERROR_MESSAGE: &str = "Error connecting to server";
