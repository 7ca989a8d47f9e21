//! UI panel modules extracted from the main app update loop.

/// Login and signup screens.
pub(super) mod auth;
/// Notes dashboard: toolbar, note form and card grid.
pub(super) mod dashboard;
/// Bottom status bar content.
pub(super) mod status_bar;
/// Transient toast notifications.
pub(super) mod toasts;
