//! Dashboard actions: list loading, search, the note form and per-note actions.

use super::{DashboardPhase, NoteDeckApp};
use crate::backend::CoreCmd;
use notedeck_core::tags::{filter_by_tag, tag_options};
use notedeck_core::{Note, NoteDraft, SaveTarget, Session, SEARCH_DEBOUNCE};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::debug;

pub(super) const BACKEND_UNAVAILABLE_MESSAGE: &str = "Background worker unavailable";

impl NoteDeckApp {
    fn next_list_seq(&mut self) -> u64 {
        self.dashboard.list_seq += 1;
        self.dashboard.list_seq
    }

    fn session_for_request(&self) -> Option<Session> {
        self.session.clone()
    }

    /// Replace the list with the full server list (`GET /notes`).
    ///
    /// Also serves as the retry action after a failed load.
    pub(super) fn request_fetch(&mut self) {
        let Some(session) = self.session_for_request() else {
            return;
        };
        let seq = self.next_list_seq();
        self.dashboard.load_error = None;
        if !self.send_cmd(CoreCmd::FetchNotes { seq, session }) {
            self.dashboard.phase = DashboardPhase::Ready;
            self.dashboard.load_error = Some(BACKEND_UNAVAILABLE_MESSAGE.to_string());
        }
    }

    /// After a mutation the server list is authoritative again, so any active
    /// search is dropped along with its pending debounce.
    pub(super) fn refresh_after_mutation(&mut self) {
        self.dashboard.search_query.clear();
        self.dashboard.search_last_input_at = None;
        self.request_fetch();
    }

    pub(super) fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.dashboard.search_query {
            return;
        }
        self.dashboard.search_query = query;
        self.dashboard.search_last_input_at = Some(Instant::now());
    }

    /// Time left before the pending search fires, if one is pending.
    pub(super) fn search_wait(&self) -> Option<Duration> {
        let last = self.dashboard.search_last_input_at?;
        Some(SEARCH_DEBOUNCE.saturating_sub(last.elapsed()))
    }

    /// Fire the pending search once input has been idle for the debounce window.
    pub(super) fn maybe_dispatch_search(&mut self) {
        let Some(last) = self.dashboard.search_last_input_at else {
            return;
        };
        if last.elapsed() < SEARCH_DEBOUNCE {
            return;
        }
        self.dashboard.search_last_input_at = None;
        self.dispatch_search();
    }

    /// Issue the list request for the current query.
    ///
    /// A blank query restores the full list via `GET /notes`. Either way the
    /// request takes a fresh sequence number, superseding anything in flight.
    pub(super) fn dispatch_search(&mut self) {
        let query = self.dashboard.search_query.trim().to_string();
        if query.is_empty() {
            self.request_fetch();
            return;
        }
        let Some(session) = self.session_for_request() else {
            return;
        };
        let seq = self.next_list_seq();
        debug!("dispatching search #{} for {:?}", seq, query);
        if !self.send_cmd(CoreCmd::SearchNotes {
            seq,
            session,
            query,
        }) {
            self.set_status(BACKEND_UNAVAILABLE_MESSAGE);
        }
    }

    /// Submit the form as a create or an update.
    ///
    /// The form clears immediately; a failed save hands the draft back.
    pub(super) fn submit_note(&mut self) {
        if self.dashboard.save_in_flight {
            return;
        }
        if let Err(message) = self.dashboard.draft.validate() {
            self.set_status(message);
            return;
        }
        let Some(session) = self.session_for_request() else {
            return;
        };
        let draft = std::mem::take(&mut self.dashboard.draft);
        let editing_id = self.dashboard.editing_id.take();
        let target = SaveTarget::from_editing_id(editing_id.as_deref());
        if self.send_cmd(CoreCmd::SaveNote {
            mount: self.dashboard.mount,
            session,
            target,
            draft: draft.clone(),
        }) {
            self.dashboard.save_in_flight = true;
        } else {
            self.dashboard.draft = draft;
            self.dashboard.editing_id = editing_id;
            self.set_status(BACKEND_UNAVAILABLE_MESSAGE);
        }
    }

    /// Put a failed draft back unless the user already started a new one.
    pub(super) fn restore_draft(&mut self, target: SaveTarget, draft: NoteDraft) {
        if !self.dashboard.draft.is_blank() || self.dashboard.editing_id.is_some() {
            debug!("form in use; not restoring failed draft");
            return;
        }
        self.dashboard.draft = draft;
        self.dashboard.editing_id = match target {
            SaveTarget::Create => None,
            SaveTarget::Update { id } => Some(id),
        };
    }

    pub(super) fn begin_edit(&mut self, id: &str) {
        let Some(note) = self.find_note(id) else {
            return;
        };
        self.dashboard.draft = NoteDraft::from_note(note);
        self.dashboard.editing_id = Some(id.to_string());
    }

    pub(super) fn cancel_edit(&mut self) {
        self.dashboard.draft = NoteDraft::default();
        self.dashboard.editing_id = None;
    }

    pub(super) fn set_attachment(&mut self, path: Option<PathBuf>) {
        self.dashboard.draft.attachment = path;
    }

    pub(super) fn delete_note(&mut self, id: &str) {
        let Some(session) = self.session_for_request() else {
            return;
        };
        if !self.send_cmd(CoreCmd::DeleteNote {
            session,
            id: id.to_string(),
        }) {
            self.set_status(BACKEND_UNAVAILABLE_MESSAGE);
        }
    }

    pub(super) fn summarize_note(&mut self, id: &str) {
        let Some(content) = self.find_note(id).map(|note| note.content.clone()) else {
            return;
        };
        let Some(session) = self.session_for_request() else {
            return;
        };
        if self.send_cmd(CoreCmd::Summarize {
            mount: self.dashboard.mount,
            session,
            id: id.to_string(),
            content,
        }) {
            self.dashboard.summarizing.insert(id.to_string());
        } else {
            self.set_status(BACKEND_UNAVAILABLE_MESSAGE);
        }
    }

    pub(super) fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    pub(super) fn find_note(&self, id: &str) -> Option<&Note> {
        self.dashboard.notes.iter().find(|note| note.id == id)
    }

    pub(super) fn tag_options(&self) -> Vec<String> {
        tag_options(&self.dashboard.notes)
    }

    pub(super) fn visible_notes(&self) -> Vec<&Note> {
        filter_by_tag(&self.dashboard.notes, &self.dashboard.selected_tag)
    }
}
