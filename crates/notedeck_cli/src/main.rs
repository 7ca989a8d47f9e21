//! Command-line client for the NoteDeck notes API.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use notedeck_core::tags::{filter_by_tag, tag_options};
use notedeck_core::{
    ApiClient, ApiError, Config, Credentials, Note, NoteDraft, SaveTarget, Session, SessionStore,
};
use std::fmt::Display;
use std::io::{self, BufRead, Read};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "ndeck", about = "NoteDeck CLI", version)]
struct Cli {
    /// API base URL (can also be set via NOTEDECK_API_URL env var)
    #[arg(short, long, env = "NOTEDECK_API_URL")]
    server: Option<String>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Request timeout in seconds (defaults to NOTEDECK_TIMEOUT_SECS or 30)
    #[arg(short = 't', long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Create an account
    Signup {
        #[arg(short, long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored session token
    Logout,
    /// List notes, optionally only those carrying one tag
    List {
        #[arg(long)]
        tag: Option<String>,
    },
    /// List distinct tags across all notes
    Tags,
    /// Create a note; content is read from stdin when omitted
    New {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: Option<String>,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
        /// File to attach
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Update a note; unspecified fields keep their current values
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        tags: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    Delete {
        id: String,
    },
    Search {
        query: String,
    },
    /// Ask the server for a summary of a note
    Summarize {
        id: String,
    },
}

/// A failed command, printed as `<action> failed: <message>`.
#[derive(Debug, Error)]
#[error("{action} failed: {message}")]
struct CommandError {
    action: &'static str,
    message: String,
}

impl CommandError {
    fn new(action: &'static str, message: impl Display) -> Self {
        Self {
            action,
            message: message.to_string(),
        }
    }
}

/// Everything a subcommand needs once the client is built.
struct Context {
    client: ApiClient,
    store: SessionStore,
    json: bool,
}

impl Context {
    fn from_config(config: &Config, json: bool) -> Result<Self, CommandError> {
        let client = ApiClient::new(config).map_err(|err| CommandError::new("Setup", err))?;
        Ok(Self {
            client,
            store: SessionStore::new(config.session_path.clone()),
            json,
        })
    }

    fn session(&self, action: &'static str) -> Result<Session, CommandError> {
        match self.store.load() {
            Ok(Some(session)) => Ok(session),
            Ok(None) => Err(CommandError::new(
                action,
                "not logged in; run `ndeck login` first",
            )),
            Err(err) => Err(CommandError::new(action, err)),
        }
    }

    /// Convert an API failure, dropping the stored session when it was rejected.
    fn api_error(&self, action: &'static str, err: ApiError) -> CommandError {
        if err.requires_login() {
            let mut message = "session expired or rejected; run `ndeck login` again".to_string();
            if let Err(clear_err) = self.store.clear() {
                message.push_str(&format!(
                    " (could not remove stored session at {}: {})",
                    self.store.path().display(),
                    clear_err
                ));
            }
            return CommandError::new(action, message);
        }
        CommandError::new(action, err.user_message())
    }

    async fn find_note(
        &self,
        action: &'static str,
        session: &Session,
        id: &str,
    ) -> Result<Note, CommandError> {
        let notes = self
            .client
            .list_notes(session)
            .await
            .map_err(|err| self.api_error(action, err))?;
        notes
            .into_iter()
            .find(|note| note.id == id)
            .ok_or_else(|| CommandError::new(action, format!("no note with id '{}'", id)))
    }
}

fn to_pretty_json(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| format!("response encoding error: {}", err))
}

fn format_notes_output(notes: &[&Note], json: bool) -> Result<String, String> {
    if json {
        return to_pretty_json(&notes);
    }
    let rows: Vec<String> = notes
        .iter()
        .map(|note| {
            let mut row = format!("{:<26} {:<30} {}", note.id, note.title, note.tags);
            if note.file_url.is_some() {
                row.push_str(" [attachment]");
            }
            row.trim_end().to_string()
        })
        .collect();
    Ok(rows.join("\n"))
}

fn format_tags_output(tags: &[String], json: bool) -> Result<String, String> {
    if json {
        return to_pretty_json(&tags);
    }
    Ok(tags.join("\n"))
}

fn format_summary_output(id: &str, summary: &str, json: bool) -> Result<String, String> {
    if json {
        return to_pretty_json(&serde_json::json!({ "id": id, "summary": summary }));
    }
    Ok(summary.to_string())
}

fn format_ack_output(action: &str, detail: &str, json: bool) -> Result<String, String> {
    if json {
        return to_pretty_json(&serde_json::json!({ "success": true, "action": action }));
    }
    Ok(format!("{}: {}", action, detail))
}

/// Overlay the provided fields on the current server copy of a note.
///
/// `PUT /notes/{id}` replaces every field, so anything not given keeps its
/// current value instead of being blanked.
fn merged_draft(
    note: &Note,
    title: Option<String>,
    content: Option<String>,
    tags: Option<String>,
    file: Option<PathBuf>,
) -> NoteDraft {
    let mut draft = NoteDraft::from_note(note);
    if let Some(title) = title {
        draft.title = title;
    }
    if let Some(content) = content {
        draft.content = content;
    }
    if let Some(tags) = tags {
        draft.tags = tags;
    }
    draft.attachment = file;
    draft
}

fn read_password(password: Option<String>) -> io::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn read_content(content: Option<String>) -> io::Result<String> {
    if let Some(content) = content {
        return Ok(content);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn credentials_for(
    action: &'static str,
    email: String,
    password: Option<String>,
) -> Result<Credentials, CommandError> {
    let password = read_password(password).map_err(|err| CommandError::new(action, err))?;
    let credentials = Credentials::new(email.trim(), password);
    credentials
        .validate()
        .map_err(|message| CommandError::new(action, message))?;
    Ok(credentials)
}

/// Run one subcommand and return what should be printed on success.
async fn execute(ctx: &Context, command: Commands) -> Result<String, CommandError> {
    let json = ctx.json;
    let output = match command {
        Commands::Completions { .. } => Ok(String::new()),
        Commands::Signup { email, password } => {
            let credentials = credentials_for("Signup", email, password)?;
            ctx.client
                .signup(&credentials)
                .await
                .map_err(|err| CommandError::new("Signup", err.auth_message("Signup failed")))?;
            format_ack_output("Signed up", &credentials.email, json)
        }
        Commands::Login { email, password } => {
            let credentials = credentials_for("Login", email, password)?;
            let session = ctx
                .client
                .login(&credentials)
                .await
                .map_err(|err| CommandError::new("Login", err.auth_message("Login failed")))?;
            ctx.store
                .save(&session)
                .map_err(|err| CommandError::new("Login", err))?;
            format_ack_output("Logged in", &credentials.email, json)
        }
        Commands::Logout => {
            ctx.store
                .clear()
                .map_err(|err| CommandError::new("Logout", err))?;
            format_ack_output("Logged out", &ctx.store.path().display().to_string(), json)
        }
        Commands::List { tag } => {
            let session = ctx.session("List")?;
            let notes = ctx
                .client
                .list_notes(&session)
                .await
                .map_err(|err| ctx.api_error("List", err))?;
            let visible = filter_by_tag(&notes, tag.as_deref().unwrap_or(""));
            format_notes_output(&visible, json)
        }
        Commands::Tags => {
            let session = ctx.session("Tags")?;
            let notes = ctx
                .client
                .list_notes(&session)
                .await
                .map_err(|err| ctx.api_error("Tags", err))?;
            format_tags_output(&tag_options(&notes), json)
        }
        Commands::New {
            title,
            content,
            tags,
            file,
        } => {
            let session = ctx.session("New")?;
            let draft = NoteDraft {
                title,
                content: read_content(content).map_err(|err| CommandError::new("New", err))?,
                tags,
                attachment: file,
            };
            draft
                .validate()
                .map_err(|message| CommandError::new("New", message))?;
            ctx.client
                .save_note(&session, &SaveTarget::Create, &draft)
                .await
                .map_err(|err| ctx.api_error("New", err))?;
            format_ack_output("Created", &draft.title, json)
        }
        Commands::Edit {
            id,
            title,
            content,
            tags,
            file,
        } => {
            let session = ctx.session("Edit")?;
            let note = ctx.find_note("Edit", &session, &id).await?;
            let draft = merged_draft(&note, title, content, tags, file);
            draft
                .validate()
                .map_err(|message| CommandError::new("Edit", message))?;
            ctx.client
                .save_note(&session, &SaveTarget::Update { id: id.clone() }, &draft)
                .await
                .map_err(|err| ctx.api_error("Edit", err))?;
            format_ack_output("Updated", &id, json)
        }
        Commands::Delete { id } => {
            let session = ctx.session("Delete")?;
            ctx.client
                .delete_note(&session, &id)
                .await
                .map_err(|err| ctx.api_error("Delete", err))?;
            format_ack_output("Deleted note", &id, json)
        }
        Commands::Search { query } => {
            let session = ctx.session("Search")?;
            let notes = ctx
                .client
                .search_notes(&session, &query)
                .await
                .map_err(|err| ctx.api_error("Search", err))?;
            let all: Vec<&Note> = notes.iter().collect();
            format_notes_output(&all, json)
        }
        Commands::Summarize { id } => {
            let session = ctx.session("Summarize")?;
            let note = ctx.find_note("Summarize", &session, &id).await?;
            let summary = ctx
                .client
                .summarize(&session, &note.content)
                .await
                .map_err(|err| ctx.api_error("Summarize", err))?;
            format_summary_output(&id, &summary, json)
        }
    };
    output.map_err(|message| CommandError::new("Output", message))
}

fn config_for(server: Option<&str>, timeout: Option<u64>) -> Config {
    let mut config = Config::from_env().with_api_url(server);
    if let Some(secs) = timeout.filter(|secs| *secs > 0) {
        config.timeout_secs = secs;
    }
    config
}

#[tokio::main]
async fn main() {
    let Cli {
        server,
        json,
        timeout,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return;
    }

    let config = config_for(server.as_deref(), timeout);
    let result = match Context::from_config(&config, json) {
        Ok(ctx) => execute(&ctx, command).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests;
