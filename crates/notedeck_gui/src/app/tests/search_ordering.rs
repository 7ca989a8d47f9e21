//! Debounced search and stale-response ordering tests.

use super::*;

#[test]
fn search_waits_for_debounce_window() {
    let mut harness = dashboard_with(sample_notes());
    harness.app.set_search_query("meet");
    harness.app.maybe_dispatch_search();

    assert!(harness.drain().is_empty());
    assert!(harness.app.search_wait().is_some());

    harness.flush_search();
    match harness.single_cmd() {
        CoreCmd::SearchNotes { query, .. } => assert_eq!(query, "meet"),
        other => panic!("expected SearchNotes, got {:?}", other),
    }
    assert!(harness.app.search_wait().is_none());
}

#[test]
fn late_response_for_superseded_search_is_ignored() {
    let mut harness = dashboard_with(sample_notes());

    harness.app.set_search_query("meeting");
    harness.flush_search();
    let meeting_seq = match harness.single_cmd() {
        CoreCmd::SearchNotes { seq, query, .. } => {
            assert_eq!(query, "meeting");
            seq
        }
        other => panic!("expected SearchNotes, got {:?}", other),
    };

    harness.app.set_search_query("");
    harness.flush_search();
    let all_seq = harness.expect_fetch();
    assert!(all_seq > meeting_seq);

    harness.app.apply_event(CoreEvent::NotesLoaded {
        seq: all_seq,
        notes: sample_notes(),
    });
    harness.app.apply_event(CoreEvent::NotesLoaded {
        seq: meeting_seq,
        notes: vec![note("n1", "Meeting", "Roadmap review", "a,b")],
    });

    assert_eq!(harness.app.dashboard.notes, sample_notes());
}

#[test]
fn stale_failure_does_not_clobber_newer_results() {
    let mut harness = dashboard_with(sample_notes());
    harness.app.set_search_query("x");
    harness.flush_search();
    let stale = match harness.single_cmd() {
        CoreCmd::SearchNotes { seq, .. } => seq,
        other => panic!("expected SearchNotes, got {:?}", other),
    };
    harness.app.set_search_query("xy");
    harness.flush_search();
    harness.drain();

    harness.app.apply_event(CoreEvent::NotesFailed {
        seq: stale,
        error: ApiError::Unauthorized,
    });

    assert_eq!(harness.app.route, Route::Dashboard);
    assert!(harness.app.session.is_some());
    assert!(harness.app.dashboard.load_error.is_none());
}

#[test]
fn mutation_refresh_supersedes_pending_search() {
    let mut harness = dashboard_with(sample_notes());
    harness.app.set_search_query("groceries");
    harness.flush_search();
    let search_seq = match harness.single_cmd() {
        CoreCmd::SearchNotes { seq, .. } => seq,
        other => panic!("expected SearchNotes, got {:?}", other),
    };

    harness.app.apply_event(CoreEvent::NoteDeleted {
        id: "n3".to_string(),
    });
    let refresh_seq = harness.expect_fetch();
    assert!(harness.app.dashboard.search_query.is_empty());

    harness.app.apply_event(CoreEvent::NotesLoaded {
        seq: search_seq,
        notes: vec![note("n2", "Groceries", "Milk and eggs", "b,c")],
    });
    assert_eq!(harness.app.dashboard.notes, sample_notes());

    harness.app.apply_event(CoreEvent::NotesLoaded {
        seq: refresh_seq,
        notes: Vec::new(),
    });
    assert!(harness.app.dashboard.notes.is_empty());
}

#[test]
fn list_response_after_logout_is_dropped() {
    let mut harness = dashboard_with(sample_notes());
    harness.app.request_fetch();
    let seq = harness.expect_fetch();
    harness.app.logout();

    harness.app.apply_event(CoreEvent::NotesLoaded {
        seq,
        notes: sample_notes(),
    });
    assert!(harness.app.dashboard.notes.is_empty());
    assert_eq!(harness.app.route, Route::Login);
}
