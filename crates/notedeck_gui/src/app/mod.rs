//! egui application shell for NoteDeck.

mod dashboard_ops;
mod events;
mod router;
mod session_ops;
mod state_feedback;
mod style;
mod ui;

#[cfg(test)]
mod tests;

use crate::backend::{spawn_backend, BackendHandle, CoreCmd};
use eframe::egui;
use notedeck_core::{ApiClient, ApiError, Config, Note, NoteDraft, Session, SessionStore};
pub(crate) use router::Route;
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Desktop application state.
///
/// Owns the UI state and communicates with the background worker via channels
/// so the `update` loop never blocks on network I/O.
pub struct NoteDeckApp {
    backend: BackendHandle,
    config: Config,
    session_store: SessionStore,
    /// In-memory session; the store is only touched at login and logout.
    session: Option<Session>,
    route: Route,
    login_form: AuthForm,
    signup_form: AuthForm,
    dashboard: DashboardState,
    /// Commands sent whose event has not come back yet.
    in_flight: usize,
    status: Option<StatusMessage>,
    toasts: VecDeque<ToastMessage>,
    dark_mode: bool,
    applied_dark_mode: Option<bool>,
}

/// Login/signup form fields.
#[derive(Debug, Default)]
struct AuthForm {
    email: String,
    password: String,
    error: Option<String>,
    submitting: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum DashboardPhase {
    Unauthenticated,
    Loading,
    Ready,
}

/// Per-mount dashboard state.
///
/// `notes` is the only canonical list; tag options and the visible grid are
/// derived from it on every frame.
#[derive(Debug)]
struct DashboardState {
    phase: DashboardPhase,
    notes: Vec<Note>,
    summaries: HashMap<String, String>,
    summarizing: HashSet<String>,
    draft: NoteDraft,
    editing_id: Option<String>,
    save_in_flight: bool,
    selected_tag: String,
    search_query: String,
    search_last_input_at: Option<Instant>,
    /// Sequence number of the newest list-replacing request.
    list_seq: u64,
    /// Bumped on every reset; saves and summaries carry the value they were
    /// issued under.
    mount: u64,
    load_error: Option<String>,
}

impl DashboardState {
    fn new() -> Self {
        Self {
            phase: DashboardPhase::Unauthenticated,
            notes: Vec::new(),
            summaries: HashMap::new(),
            summarizing: HashSet::new(),
            draft: NoteDraft::default(),
            editing_id: None,
            save_in_flight: false,
            selected_tag: String::new(),
            search_query: String::new(),
            search_last_input_at: None,
            list_seq: 0,
            mount: 0,
            load_error: None,
        }
    }

    /// Drop everything tied to the current mount.
    ///
    /// `list_seq` survives and `mount` advances, so responses to requests
    /// issued before the reset can never match a later request.
    fn reset(&mut self) {
        let list_seq = self.list_seq;
        let mount = self.mount;
        *self = Self::new();
        self.list_seq = list_seq;
        self.mount = mount + 1;
    }
}

struct StatusMessage {
    text: String,
    expires_at: Instant,
}

struct ToastMessage {
    text: String,
    expires_at: Instant,
}

pub(crate) const DEFAULT_WINDOW_SIZE: [f32; 2] = [1100.0, 760.0];
pub(crate) const MIN_WINDOW_SIZE: [f32; 2] = [720.0, 520.0];
const STATUS_TTL: Duration = Duration::from_secs(5);
const TOAST_TTL: Duration = Duration::from_secs(4);
const TOAST_LIMIT: usize = 4;
const IN_FLIGHT_POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Path opened at startup; the dashboard redirects to login without a session.
const START_PATH: &str = "/dashboard";

impl NoteDeckApp {
    /// Construct the app from the current environment config.
    ///
    /// Loads any stored session, spawns the backend worker and mounts the
    /// dashboard, which falls through to the login screen when no session is
    /// stored.
    ///
    /// # Errors
    /// Returns an error if the configured API URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new() -> Result<Self, ApiError> {
        let config = Config::from_env();
        let client = ApiClient::new(&config)?;
        let session_store = SessionStore::new(config.session_path.clone());
        let session = match session_store.load() {
            Ok(session) => session,
            Err(err) => {
                warn!("ignoring unreadable session file: {}", err);
                None
            }
        };
        info!(
            "desktop client using API at {} (session {})",
            config.api_url,
            if session.is_some() { "restored" } else { "absent" }
        );

        let backend = spawn_backend(client);
        let mut app = Self::with_parts(config, session_store, session, backend);
        app.navigate(Route::from_path(START_PATH));
        Ok(app)
    }

    fn with_parts(
        config: Config,
        session_store: SessionStore,
        session: Option<Session>,
        backend: BackendHandle,
    ) -> Self {
        Self {
            backend,
            config,
            session_store,
            session,
            route: Route::Login,
            login_form: AuthForm::default(),
            signup_form: AuthForm::default(),
            dashboard: DashboardState::new(),
            in_flight: 0,
            status: None,
            toasts: VecDeque::with_capacity(TOAST_LIMIT),
            dark_mode: true,
            applied_dark_mode: None,
        }
    }

    /// Hand a command to the worker.
    ///
    /// # Returns
    /// `false` when the worker is gone; the caller decides how to recover.
    fn send_cmd(&mut self, cmd: CoreCmd) -> bool {
        if self.backend.cmd_tx.send(cmd).is_ok() {
            self.in_flight += 1;
            true
        } else {
            warn!("backend worker unavailable; command dropped");
            false
        }
    }

    /// Switch to `route` and run its mount logic.
    fn navigate(&mut self, route: Route) {
        debug!("navigating to {}", route.path());
        self.route = route;
        if route == Route::Dashboard {
            self.mount_dashboard();
        }
    }
}

impl eframe::App for NoteDeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_style(ctx);

        while let Ok(event) = self.backend.evt_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.apply_event(event);
        }
        self.expire_feedback();
        if self.route == Route::Dashboard {
            self.maybe_dispatch_search();
        }

        self.render_status_bar(ctx);
        match self.route {
            Route::Login => self.render_login(ctx),
            Route::Signup => self.render_signup(ctx),
            Route::Dashboard => self.render_dashboard(ctx),
        }
        self.render_toasts(ctx);

        if self.in_flight > 0 {
            ctx.request_repaint_after(IN_FLIGHT_POLL_INTERVAL);
        } else if let Some(wait) = self.search_wait() {
            ctx.request_repaint_after(wait);
        } else if !self.toasts.is_empty() || self.status.is_some() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}
