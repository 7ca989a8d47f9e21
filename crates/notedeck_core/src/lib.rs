//! Core library for NoteDeck (config, session, models, API client).

/// Async HTTP client for the notes API.
pub mod api;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Scoped environment overrides for tests.
#[cfg(any(test, feature = "test-support"))]
pub mod env;
/// Client error types.
pub mod error;
/// Wire and form models.
pub mod models;
/// Session persistence.
pub mod session;
/// Tag derivation and filtering.
pub mod tags;
/// In-process mock of the notes API.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use api::ApiClient;
pub use config::Config;
pub use constants::*;
pub use error::{ApiError, SessionError};
pub use models::{Credentials, Note, NoteDraft, SaveTarget};
pub use session::{Session, SessionStore};
