//! Applies backend events to UI state.

use super::{DashboardPhase, NoteDeckApp, Route};
use crate::backend::{CoreErrorSource, CoreEvent};
use notedeck_core::ApiError;
use tracing::{debug, warn};

impl NoteDeckApp {
    /// Fold one backend event into the app state.
    pub(super) fn apply_event(&mut self, event: CoreEvent) {
        match event {
            CoreEvent::SignedUp => self.on_signed_up(),
            CoreEvent::LoggedIn { session } => self.on_logged_in(session),
            CoreEvent::NotesLoaded { seq, notes } => {
                if !self.is_current_list_response(seq) {
                    return;
                }
                self.dashboard.notes = notes;
                self.dashboard.phase = DashboardPhase::Ready;
                self.dashboard.load_error = None;
            }
            CoreEvent::NotesFailed { seq, error } => {
                if !self.is_current_list_response(seq) {
                    return;
                }
                if error.requires_login() {
                    self.force_relogin();
                    return;
                }
                let message = error.user_message();
                warn!("note list request failed: {}", error);
                self.dashboard.phase = DashboardPhase::Ready;
                self.dashboard.load_error = Some(message.clone());
                self.set_status(format!("Could not load notes: {}", message));
            }
            CoreEvent::NoteSaved { mount, target } => {
                if !self.is_current_mount(mount) {
                    return;
                }
                self.dashboard.save_in_flight = false;
                self.set_status(format!("{} succeeded", target.verb()));
                self.refresh_after_mutation();
            }
            CoreEvent::NoteSaveFailed {
                mount,
                target,
                draft,
                error,
            } => {
                if !self.is_current_mount(mount) {
                    return;
                }
                self.dashboard.save_in_flight = false;
                if self.handle_session_error(&error) {
                    return;
                }
                self.set_status(format!("{} failed: {}", target.verb(), error.user_message()));
                self.restore_draft(target, draft);
            }
            CoreEvent::NoteDeleted { id } => {
                if self.dashboard.editing_id.as_deref() == Some(id.as_str()) {
                    self.cancel_edit();
                }
                self.dashboard.summaries.remove(&id);
                self.set_status("Note deleted");
                self.refresh_after_mutation();
            }
            CoreEvent::Summarized { mount, id, summary } => {
                if !self.is_current_mount(mount) {
                    return;
                }
                self.dashboard.summarizing.remove(&id);
                self.dashboard.summaries.insert(id, summary);
            }
            CoreEvent::Error { source, error } => self.on_error(source, error),
        }
    }

    fn on_error(&mut self, source: CoreErrorSource, error: ApiError) {
        match &source {
            CoreErrorSource::Signup | CoreErrorSource::Login => {
                self.on_auth_failed(&source, &error);
            }
            CoreErrorSource::DeleteNote { .. } => {
                if !self.handle_session_error(&error) {
                    self.set_status(format!("Delete failed: {}", error.user_message()));
                }
            }
            CoreErrorSource::Summarize { mount, id } => {
                if !self.is_current_mount(*mount) {
                    return;
                }
                self.dashboard.summarizing.remove(id);
                if !self.handle_session_error(&error) {
                    self.set_status(format!("Summarize failed: {}", error.user_message()));
                }
            }
        }
    }

    /// Route a rejected session to the login screen.
    ///
    /// # Returns
    /// `true` when the error was consumed.
    fn handle_session_error(&mut self, error: &ApiError) -> bool {
        if error.requires_login() && self.session.is_some() {
            self.force_relogin();
            return true;
        }
        false
    }

    /// Only the newest list-replacing request may touch the list, and only
    /// while the dashboard is showing.
    fn is_current_list_response(&self, seq: u64) -> bool {
        let current = seq == self.dashboard.list_seq
            && self.route == Route::Dashboard
            && self.session.is_some();
        if !current {
            debug!(
                "dropping stale list response #{} (latest #{})",
                seq, self.dashboard.list_seq
            );
        }
        current
    }

    /// Saves and summaries only apply to the dashboard mount that issued them.
    fn is_current_mount(&self, mount: u64) -> bool {
        let current = mount == self.dashboard.mount && self.session.is_some();
        if !current {
            debug!(
                "dropping response from dashboard mount #{} (current #{})",
                mount, self.dashboard.mount
            );
        }
        current
    }
}
