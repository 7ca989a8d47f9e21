//! Background worker thread for API access.

use crate::backend::{CoreCmd, CoreErrorSource, CoreEvent};
use crossbeam_channel::{unbounded, Receiver, Sender};
use notedeck_core::ApiClient;
use std::thread;
use tracing::{debug, error};

/// Handle for sending commands to, and receiving events from, the backend worker.
pub struct BackendHandle {
    pub cmd_tx: Sender<CoreCmd>,
    pub evt_rx: Receiver<CoreEvent>,
}

impl BackendHandle {
    /// Wrap bare channels so tests can play the worker's role.
    #[cfg(test)]
    pub(crate) fn from_test_channels(cmd_tx: Sender<CoreCmd>, evt_rx: Receiver<CoreEvent>) -> Self {
        Self { cmd_tx, evt_rx }
    }
}

/// Run one command to completion and describe the outcome.
async fn execute(client: &ApiClient, cmd: CoreCmd) -> CoreEvent {
    match cmd {
        CoreCmd::Signup { credentials } => match client.signup(&credentials).await {
            Ok(()) => CoreEvent::SignedUp,
            Err(error) => {
                error!("signup failed: {}", error);
                CoreEvent::Error {
                    source: CoreErrorSource::Signup,
                    error,
                }
            }
        },
        CoreCmd::Login { credentials } => match client.login(&credentials).await {
            Ok(session) => CoreEvent::LoggedIn { session },
            Err(error) => CoreEvent::Error {
                source: CoreErrorSource::Login,
                error,
            },
        },
        CoreCmd::FetchNotes { seq, session } => match client.list_notes(&session).await {
            Ok(notes) => CoreEvent::NotesLoaded { seq, notes },
            Err(error) => CoreEvent::NotesFailed { seq, error },
        },
        CoreCmd::SearchNotes {
            seq,
            session,
            query,
        } => match client.search_notes(&session, &query).await {
            Ok(notes) => CoreEvent::NotesLoaded { seq, notes },
            Err(error) => CoreEvent::NotesFailed { seq, error },
        },
        CoreCmd::SaveNote {
            mount,
            session,
            target,
            draft,
        } => match client.save_note(&session, &target, &draft).await {
            Ok(()) => CoreEvent::NoteSaved { mount, target },
            Err(error) => CoreEvent::NoteSaveFailed {
                mount,
                target,
                draft,
                error,
            },
        },
        CoreCmd::DeleteNote { session, id } => match client.delete_note(&session, &id).await {
            Ok(()) => CoreEvent::NoteDeleted { id },
            Err(error) => CoreEvent::Error {
                source: CoreErrorSource::DeleteNote { id },
                error,
            },
        },
        CoreCmd::Summarize {
            mount,
            session,
            id,
            content,
        } => match client.summarize(&session, &content).await {
            Ok(summary) => CoreEvent::Summarized { mount, id, summary },
            Err(error) => CoreEvent::Error {
                source: CoreErrorSource::Summarize { mount, id },
                error,
            },
        },
    }
}

/// Spawn the backend worker thread that performs all HTTP access.
///
/// The worker owns a tokio runtime and runs each command as its own task, so
/// requests overlap and their events may arrive in any order. Callers that
/// care about ordering (list refreshes) tag commands with sequence numbers.
///
/// # Returns
/// A [`BackendHandle`] containing the command sender and event receiver.
///
/// # Panics
/// Panics if the worker thread cannot be spawned.
pub fn spawn_backend(client: ApiClient) -> BackendHandle {
    let (cmd_tx, cmd_rx) = unbounded::<CoreCmd>();
    let (evt_tx, evt_rx) = unbounded();

    thread::Builder::new()
        .name("notedeck-gui-backend".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .thread_name("notedeck-gui-http")
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(err) => {
                    // Dropping the receiver makes every later send fail, which
                    // the UI reports as "backend unavailable".
                    error!("failed to start backend runtime: {}", err);
                    return;
                }
            };

            for cmd in cmd_rx.iter() {
                let client = client.clone();
                let evt_tx = evt_tx.clone();
                rt.spawn(async move {
                    let event = execute(&client, cmd).await;
                    let _ = evt_tx.send(event);
                });
            }
            debug!("backend command channel closed; shutting down worker");
        })
        .expect("spawn backend thread");

    BackendHandle { cmd_tx, evt_rx }
}
