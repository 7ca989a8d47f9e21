//! Unit tests for the `ndeck` CLI entrypoint module.

use super::{
    config_for, execute, format_notes_output, format_summary_output, format_tags_output,
    merged_draft, Cli, Commands, Context,
};
use clap::Parser;
use notedeck_core::env::ScopedEnv;
use notedeck_core::test_support::MockBackend;
use notedeck_core::{
    ApiClient, ApiError, Config, Note, Session, SessionStore, DEFAULT_API_URL,
};
use tempfile::TempDir;

fn note(id: &str, title: &str, tags: &str) -> Note {
    Note {
        id: id.to_string(),
        title: title.to_string(),
        content: format!("{} body", title),
        tags: tags.to_string(),
        file_url: None,
    }
}

struct CliHarness {
    _dir: TempDir,
    mock: MockBackend,
    ctx: Context,
}

impl CliHarness {
    fn new(json: bool) -> Self {
        let mock = MockBackend::start();
        let dir = TempDir::new().expect("temp dir");
        let config = Config {
            api_url: mock.url(),
            session_path: dir.path().join("token"),
            timeout_secs: 5,
            auth_scheme: None,
        };
        let ctx = Context {
            client: ApiClient::new(&config).expect("client"),
            store: SessionStore::new(config.session_path.clone()),
            json,
        };
        Self {
            _dir: dir,
            mock,
            ctx,
        }
    }

    fn logged_in(json: bool) -> Self {
        let harness = Self::new(json);
        let session = Session::new(harness.mock.issue_token()).expect("session");
        harness.ctx.store.save(&session).expect("save session");
        harness
    }

    async fn run(&self, args: &[&str]) -> Result<String, String> {
        let mut argv = vec!["ndeck"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).expect("cli should parse");
        execute(&self.ctx, cli.command)
            .await
            .map_err(|err| err.to_string())
    }
}

#[test]
fn cli_parses_edit_with_partial_fields() {
    let cli = Cli::try_parse_from(["ndeck", "edit", "n1", "--tags", "a,b"])
        .expect("cli should parse edit");
    match cli.command {
        Commands::Edit {
            id,
            title,
            content,
            tags,
            file,
        } => {
            assert_eq!(id, "n1");
            assert!(title.is_none() && content.is_none() && file.is_none());
            assert_eq!(tags.as_deref(), Some("a,b"));
        }
        _ => panic!("expected edit command"),
    }
}

#[test]
fn global_json_flag_is_accepted_after_subcommand() {
    let cli = Cli::try_parse_from(["ndeck", "list", "--tag", "work", "--json"])
        .expect("cli should parse list");
    assert!(cli.json);
    assert!(matches!(cli.command, Commands::List { tag: Some(ref t) } if t == "work"));
}

#[test]
fn server_flag_and_env_override_config() {
    let mut env = ScopedEnv::lock();
    env.set("NOTEDECK_API_URL", "http://env.example:9000/")
        .unset("NOTEDECK_TIMEOUT_SECS");

    let cli = Cli::parse_from(["ndeck", "tags"]);
    assert_eq!(cli.server.as_deref(), Some("http://env.example:9000/"));
    let config = config_for(cli.server.as_deref(), None);
    assert_eq!(config.api_url, "http://env.example:9000");
    assert_eq!(config.timeout_secs, 30);

    let config = config_for(Some("http://flag.example/"), Some(3));
    assert_eq!(config.api_url, "http://flag.example");
    assert_eq!(config.timeout_secs, 3);
}

#[test]
fn blank_server_override_keeps_default() {
    let mut env = ScopedEnv::lock();
    env.unset("NOTEDECK_API_URL");
    assert_eq!(config_for(Some("   "), None).api_url, DEFAULT_API_URL);
}

#[test]
fn merged_draft_keeps_unspecified_fields() {
    let current = note("n1", "Plan", "work,q3");
    let draft = merged_draft(&current, None, Some("new body".to_string()), None, None);
    assert_eq!(draft.title, "Plan");
    assert_eq!(draft.content, "new body");
    assert_eq!(draft.tags, "work,q3");
    assert!(draft.attachment.is_none());
}

#[test]
fn output_helpers_render_text_and_json() {
    let notes = [note("n1", "Plan", "work"), note("n2", "Shopping", "")];
    let refs: Vec<&Note> = notes.iter().collect();

    let text = format_notes_output(&refs, false).expect("text output");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("n1"));
    assert!(lines[0].ends_with("work"));

    let rendered = format_notes_output(&refs, true).expect("json output");
    let parsed: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
    assert_eq!(parsed[1]["_id"], "n2");

    let tags = vec!["a".to_string(), "b".to_string()];
    assert_eq!(format_tags_output(&tags, false).expect("tags"), "a\nb");

    let summary = format_summary_output("n1", "short", true).expect("summary json");
    let parsed: serde_json::Value = serde_json::from_str(&summary).expect("valid json");
    assert_eq!(parsed["summary"], "short");
}

#[tokio::test]
async fn login_stores_session_and_logout_clears_it() {
    let harness = CliHarness::new(false);
    harness.mock.register_user("ada@example.com", "pw");

    let out = harness
        .run(&["login", "-e", "ada@example.com", "-p", "pw"])
        .await
        .expect("login");
    assert_eq!(out, "Logged in: ada@example.com");
    assert!(harness.ctx.store.load().expect("load").is_some());

    harness.run(&["logout"]).await.expect("logout");
    assert!(harness.ctx.store.load().expect("load").is_none());

    let err = harness.run(&["list"]).await.expect_err("logged out");
    assert_eq!(err, "List failed: not logged in; run `ndeck login` first");
}

#[tokio::test]
async fn bad_login_reports_server_message() {
    let harness = CliHarness::new(false);
    let err = harness
        .run(&["login", "-e", "nobody@example.com", "-p", "pw"])
        .await
        .expect_err("unknown user");
    assert_eq!(err, "Login failed: Invalid credentials");
    assert!(harness.ctx.store.load().expect("load").is_none());
}

#[tokio::test]
async fn signup_duplicate_surfaces_server_message() {
    let harness = CliHarness::new(false);
    harness
        .run(&["signup", "-e", "ada@example.com", "-p", "pw"])
        .await
        .expect("signup");
    let err = harness
        .run(&["signup", "-e", "ada@example.com", "-p", "pw"])
        .await
        .expect_err("duplicate");
    assert_eq!(err, "Signup failed: User already exists");
}

#[tokio::test]
async fn new_edit_delete_round_trip_against_server() {
    let harness = CliHarness::logged_in(false);

    harness
        .run(&["new", "--title", "Plan", "--content", "ship", "--tags", "work"])
        .await
        .expect("new");
    let created = harness.mock.notes().pop().expect("created note");

    harness
        .run(&["edit", &created.id, "--content", "ship it"])
        .await
        .expect("edit");
    let updated = harness.mock.notes().pop().expect("updated note");
    assert_eq!(updated.title, "Plan");
    assert_eq!(updated.content, "ship it");
    assert_eq!(updated.tags, "work");
    assert_eq!(
        harness
            .mock
            .requests_to("PUT", &format!("/notes/{}", created.id))
            .len(),
        1
    );

    harness
        .run(&["delete", &created.id])
        .await
        .expect("delete");
    assert!(harness.mock.notes().is_empty());
}

#[tokio::test]
async fn edit_of_unknown_note_fails_without_put() {
    let harness = CliHarness::logged_in(false);
    let err = harness
        .run(&["edit", "missing", "--title", "x"])
        .await
        .expect_err("unknown id");
    assert_eq!(err, "Edit failed: no note with id 'missing'");
    assert!(harness.mock.requests_to("PUT", "/notes/missing").is_empty());
}

#[tokio::test]
async fn list_filters_by_tag_and_tags_are_deduplicated() {
    let harness = CliHarness::logged_in(true);
    harness.mock.seed_note("One", "1", "a,b");
    harness.mock.seed_note("Two", "2", "b,c");
    harness.mock.seed_note("Three", "3", "d");

    let out = harness.run(&["list", "--tag", "b"]).await.expect("list");
    let parsed: serde_json::Value = serde_json::from_str(&out).expect("json");
    let titles: Vec<&str> = parsed
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|note| note["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["One", "Two"]);

    let out = harness.run(&["tags"]).await.expect("tags");
    let tags: Vec<String> = serde_json::from_str(&out).expect("json");
    assert_eq!(tags, vec!["a", "b", "c", "d"]);
}

#[tokio::test]
async fn summarize_prints_summary_for_note_content() {
    let harness = CliHarness::logged_in(false);
    let seeded = harness.mock.seed_note("Standup", "Discussed the release", "");

    let out = harness
        .run(&["summarize", &seeded.id])
        .await
        .expect("summarize");
    assert_eq!(out, "Summary: Discussed the release");
}

#[tokio::test]
async fn rejected_session_is_cleared() {
    let harness = CliHarness::logged_in(false);
    harness.mock.revoke_tokens();

    let err = harness.run(&["search", "x"]).await.expect_err("revoked");
    assert_eq!(
        err,
        "Search failed: session expired or rejected; run `ndeck login` again"
    );
    assert!(harness.ctx.store.load().expect("load").is_none());
}

#[test]
fn rejected_session_reports_a_store_that_cannot_be_cleared() {
    let dir = TempDir::new().expect("temp dir");
    let blocked = dir.path().join("token");
    std::fs::create_dir(&blocked).expect("dir in place of token file");
    let ctx = Context {
        client: ApiClient::new(&Config {
            api_url: DEFAULT_API_URL.to_string(),
            session_path: blocked.clone(),
            timeout_secs: 5,
            auth_scheme: None,
        })
        .expect("client"),
        store: SessionStore::new(blocked.clone()),
        json: false,
    };

    let err = ctx.api_error("List", ApiError::Unauthorized).to_string();
    assert!(
        err.starts_with("List failed: session expired or rejected; run `ndeck login` again"),
        "{}",
        err
    );
    assert!(err.contains("could not remove stored session"), "{}", err);
    assert!(blocked.is_dir());
}
