//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT_SECS, SESSION_FILE_NAME};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration shared by the desktop app and the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL every API path and attachment URL is resolved against.
    pub api_url: String,
    /// Where the session token is persisted between runs.
    pub session_path: PathBuf,
    pub timeout_secs: u64,
    /// Optional scheme put in front of the token in the `Authorization` header.
    pub auth_scheme: Option<String>,
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    if let (Ok(drive), Ok(path)) = (env::var("HOMEDRIVE"), env::var("HOMEPATH")) {
        if !drive.trim().is_empty() && !path.trim().is_empty() {
            return Some(PathBuf::from(format!("{}{}", drive, path)));
        }
    }

    std::env::current_dir().ok()
}

/// Trim whitespace and trailing slashes from a base URL.
///
/// # Returns
/// The normalized URL, or `None` when nothing usable remains.
pub fn normalize_base_url(raw: &str) -> Option<String> {
    let mut value = raw.trim().to_string();
    while value.ends_with('/') {
        value.pop();
    }
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn non_blank_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Default session file location (`~/.cache/notedeck/token`).
pub fn default_session_path() -> PathBuf {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache").join("notedeck").join(SESSION_FILE_NAME)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("NOTEDECK_API_URL")
                .ok()
                .and_then(|url| normalize_base_url(&url))
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            session_path: non_blank_env("NOTEDECK_SESSION_PATH")
                .map(|path| PathBuf::from(expand_tilde(path)))
                .unwrap_or_else(default_session_path),
            timeout_secs: env::var("NOTEDECK_TIMEOUT_SECS")
                .ok()
                .and_then(|secs| secs.trim().parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            auth_scheme: non_blank_env("NOTEDECK_AUTH_SCHEME"),
        }
    }

    /// Replace the API base URL, ignoring blank overrides.
    pub fn with_api_url(mut self, api_url: Option<&str>) -> Self {
        if let Some(url) = api_url.and_then(normalize_base_url) {
            self.api_url = url;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
