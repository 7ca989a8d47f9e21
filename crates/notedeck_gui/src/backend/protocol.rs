//! Protocol types for the desktop backend worker.

use notedeck_core::{ApiError, Credentials, Note, NoteDraft, SaveTarget, Session};

/// Commands issued by the UI thread for the backend worker to execute.
///
/// Every command produces exactly one [`CoreEvent`].
#[derive(Debug)]
pub enum CoreCmd {
    /// Register a new account.
    Signup { credentials: Credentials },
    /// Exchange credentials for a session token.
    Login { credentials: Credentials },
    /// Replace the note list with the full server list.
    FetchNotes { seq: u64, session: Session },
    /// Replace the note list with search results.
    SearchNotes {
        seq: u64,
        session: Session,
        query: String,
    },
    /// Create or update a note from a draft.
    ///
    /// `mount` is the dashboard mount that issued the save; it is echoed back
    /// so a response arriving after logout is not applied to the next user.
    SaveNote {
        mount: u64,
        session: Session,
        target: SaveTarget,
        draft: NoteDraft,
    },
    DeleteNote { session: Session, id: String },
    /// Request an AI summary of a note's content.
    Summarize {
        mount: u64,
        session: Session,
        id: String,
        content: String,
    },
}

/// Which command an [`CoreEvent::Error`] belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreErrorSource {
    Signup,
    Login,
    DeleteNote { id: String },
    Summarize { mount: u64, id: String },
}

/// Events produced by the backend worker and polled by the UI thread.
#[derive(Debug)]
pub enum CoreEvent {
    SignedUp,
    LoggedIn { session: Session },
    /// A list-replacing response (`/notes` or `/search`) for request `seq`.
    NotesLoaded { seq: u64, notes: Vec<Note> },
    /// A list-replacing request `seq` failed.
    NotesFailed { seq: u64, error: ApiError },
    NoteSaved { mount: u64, target: SaveTarget },
    /// Save failed; the submitted draft comes back so the form can be restored.
    NoteSaveFailed {
        mount: u64,
        target: SaveTarget,
        draft: NoteDraft,
        error: ApiError,
    },
    NoteDeleted { id: String },
    Summarized {
        mount: u64,
        id: String,
        summary: String,
    },
    Error {
        source: CoreErrorSource,
        error: ApiError,
    },
}
