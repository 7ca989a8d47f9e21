//! Wire and form models shared by the desktop app and the CLI.

pub mod auth;
pub mod note;

pub use auth::{Credentials, LoginResponse, SummaryRequest, SummaryResponse};
pub use note::{Note, NoteDraft, SaveTarget};
