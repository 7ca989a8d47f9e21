//! App state tests driven through fake backend channels.

use super::*;
use crate::backend::{BackendHandle, CoreCmd, CoreErrorSource, CoreEvent};
use crossbeam_channel::{unbounded, Receiver, Sender};
use notedeck_core::SEARCH_DEBOUNCE;
use tempfile::TempDir;

mod search_ordering;

const TEST_TOKEN: &str = "token-test";

struct TestHarness {
    _dir: TempDir,
    app: NoteDeckApp,
    cmd_rx: Receiver<CoreCmd>,
    _evt_tx: Sender<CoreEvent>,
}

impl TestHarness {
    /// Commands the app sent since the last drain.
    fn drain(&self) -> Vec<CoreCmd> {
        self.cmd_rx.try_iter().collect()
    }

    /// Exactly one command must be pending; return it.
    fn single_cmd(&self) -> CoreCmd {
        let mut cmds = self.drain();
        assert_eq!(cmds.len(), 1, "expected one command, got {:?}", cmds);
        cmds.remove(0)
    }

    /// The pending command must be a full list fetch; return its sequence.
    fn expect_fetch(&self) -> u64 {
        match self.single_cmd() {
            CoreCmd::FetchNotes { seq, session } => {
                assert_eq!(session.token(), TEST_TOKEN);
                seq
            }
            other => panic!("expected FetchNotes, got {:?}", other),
        }
    }

    fn stored_session(&self) -> Option<Session> {
        self.app.session_store.load().expect("read session file")
    }

    /// Pretend the search box has been idle past the debounce window.
    fn flush_search(&mut self) {
        self.app.dashboard.search_last_input_at = Some(Instant::now() - SEARCH_DEBOUNCE);
        self.app.maybe_dispatch_search();
    }
}

fn note(id: &str, title: &str, content: &str, tags: &str) -> Note {
    Note {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        tags: tags.to_string(),
        file_url: None,
    }
}

fn make_app(token: Option<&str>) -> TestHarness {
    let (cmd_tx, cmd_rx) = unbounded();
    let (evt_tx, evt_rx) = unbounded();
    let dir = TempDir::new().expect("temp dir");
    let config = Config {
        api_url: "http://notes.test".to_string(),
        session_path: dir.path().join("token"),
        timeout_secs: 5,
        auth_scheme: None,
    };
    let store = SessionStore::new(config.session_path.clone());
    let session = token.map(|token| {
        let session = Session::new(token).expect("session");
        store.save(&session).expect("save session");
        session
    });
    let app = NoteDeckApp::with_parts(
        config,
        store,
        session,
        BackendHandle::from_test_channels(cmd_tx, evt_rx),
    );
    TestHarness {
        _dir: dir,
        app,
        cmd_rx,
        _evt_tx: evt_tx,
    }
}

/// Logged-in app on the dashboard with `notes` loaded and no pending commands.
fn dashboard_with(notes: Vec<Note>) -> TestHarness {
    let mut harness = make_app(Some(TEST_TOKEN));
    harness.app.navigate(Route::Dashboard);
    let seq = harness.expect_fetch();
    harness.app.apply_event(CoreEvent::NotesLoaded { seq, notes });
    assert_eq!(harness.app.dashboard.phase, DashboardPhase::Ready);
    harness
}

fn sample_notes() -> Vec<Note> {
    vec![
        note("n1", "Meeting", "Roadmap review", "a,b"),
        note("n2", "Groceries", "Milk and eggs", "b,c"),
        note("n3", "Ideas", "Write more", "d"),
    ]
}

fn ids(notes: &[&Note]) -> Vec<String> {
    notes.iter().map(|note| note.id.clone()).collect()
}
