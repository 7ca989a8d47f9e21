//! Test-only mock of the notes API.
//!
//! [`MockBackend`] serves the same routes as the real backend from an axum
//! router on a background thread with its own tokio runtime, records every
//! request, and can delay searches or fail the next call so tests can drive
//! races and error paths.

use crate::models::Note;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::{mpsc, Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::oneshot;

/// One request as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub query: Option<String>,
    /// Text fields of multipart or JSON bodies.
    pub fields: BTreeMap<String, String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Default)]
struct MockState {
    users: HashMap<String, String>,
    tokens: HashMap<String, String>,
    notes: Vec<Note>,
    next_id: u64,
    requests: Vec<RecordedRequest>,
    search_delays: HashMap<String, Duration>,
    fail_next: Option<(StatusCode, String)>,
}

type Shared = Arc<Mutex<MockState>>;

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().expect("mock backend state lock")
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}

impl RecordedRequest {
    fn new(method: &str, path: impl Into<String>, headers: &HeaderMap) -> Self {
        Self {
            method: method.to_string(),
            path: path.into(),
            authorization: header_value(headers, "authorization"),
            query: None,
            fields: BTreeMap::new(),
            file_name: None,
        }
    }

    fn with_fields(mut self, fields: &BTreeMap<String, String>) -> Self {
        self.fields = fields.clone();
        self
    }

    fn with_file(mut self, file_name: &Option<String>) -> Self {
        self.file_name = file_name.clone();
        self
    }

    fn with_query(mut self, query: &str) -> Self {
        self.query = Some(query.to_string());
        self
    }
}

fn record(state: &Shared, request: RecordedRequest) {
    lock(state).requests.push(request);
}

/// Accept the raw token or any `<scheme> <token>` form.
fn authorize(state: &Shared, headers: &HeaderMap) -> Result<(), Response> {
    let Some(raw) = header_value(headers, "authorization") else {
        return Err(message(StatusCode::UNAUTHORIZED, "No token provided"));
    };
    let token = raw.rsplit(' ').next().unwrap_or_default();
    if lock(state).tokens.contains_key(token) {
        Ok(())
    } else {
        Err(message(StatusCode::UNAUTHORIZED, "Invalid token"))
    }
}

fn take_failure(state: &Shared) -> Option<Response> {
    lock(state)
        .fail_next
        .take()
        .map(|(status, text)| message(status, &text))
}

fn json_fields(body: &Value) -> BTreeMap<String, String> {
    body.as_object()
        .map(|object| {
            object
                .iter()
                .map(|(key, value)| {
                    let text = value
                        .as_str()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| value.to_string());
                    (key.clone(), text)
                })
                .collect()
        })
        .unwrap_or_default()
}

async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(BTreeMap<String, String>, Option<String>), Response> {
    let mut fields = BTreeMap::new();
    let mut file_name = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return Err(message(StatusCode::BAD_REQUEST, &err.to_string())),
        };
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            file_name = field.file_name().map(ToString::to_string);
            if let Err(err) = field.bytes().await {
                return Err(message(StatusCode::BAD_REQUEST, &err.to_string()));
            }
            continue;
        }
        match field.text().await {
            Ok(text) => {
                fields.insert(name, text);
            }
            Err(err) => return Err(message(StatusCode::BAD_REQUEST, &err.to_string())),
        }
    }
    Ok((fields, file_name))
}

async fn signup(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let fields = json_fields(&body);
    record(&state, RecordedRequest::new("POST", "/signup", &headers).with_fields(&fields));
    let email = fields.get("email").cloned().unwrap_or_default();
    let password = fields.get("password").cloned().unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return message(StatusCode::BAD_REQUEST, "Email and password are required");
    }
    let mut guard = lock(&state);
    if guard.users.contains_key(&email) {
        return message(StatusCode::BAD_REQUEST, "User already exists");
    }
    guard.users.insert(email, password);
    message(StatusCode::CREATED, "User registered")
}

async fn login(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let fields = json_fields(&body);
    record(&state, RecordedRequest::new("POST", "/login", &headers).with_fields(&fields));
    let email = fields.get("email").cloned().unwrap_or_default();
    let password = fields.get("password").cloned().unwrap_or_default();
    let mut guard = lock(&state);
    if guard.users.get(&email) != Some(&password) {
        return message(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    guard.next_id += 1;
    let token = format!("token-{}", guard.next_id);
    guard.tokens.insert(token.clone(), email);
    (StatusCode::OK, Json(json!({ "token": token }))).into_response()
}

async fn list_notes(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, RecordedRequest::new("GET", "/notes", &headers));
    if let Err(res) = authorize(&state, &headers) {
        return res;
    }
    if let Some(res) = take_failure(&state) {
        return res;
    }
    let notes = lock(&state).notes.clone();
    Json(notes).into_response()
}

async fn create_note(
    State(state): State<Shared>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let (fields, file_name) = match read_multipart(multipart).await {
        Ok(parsed) => parsed,
        Err(res) => return res,
    };
    record(
        &state,
        RecordedRequest::new("POST", "/notes", &headers)
            .with_fields(&fields)
            .with_file(&file_name),
    );
    if let Err(res) = authorize(&state, &headers) {
        return res;
    }
    if let Some(res) = take_failure(&state) {
        return res;
    }
    let mut guard = lock(&state);
    guard.next_id += 1;
    let note = Note {
        id: format!("note-{}", guard.next_id),
        title: fields.get("title").cloned().unwrap_or_default(),
        content: fields.get("content").cloned().unwrap_or_default(),
        tags: fields.get("tags").cloned().unwrap_or_default(),
        file_url: file_name.map(|name| format!("/uploads/{}", name)),
    };
    guard.notes.push(note.clone());
    (StatusCode::CREATED, Json(note)).into_response()
}

async fn update_note(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let (fields, file_name) = match read_multipart(multipart).await {
        Ok(parsed) => parsed,
        Err(res) => return res,
    };
    record(
        &state,
        RecordedRequest::new("PUT", format!("/notes/{}", id), &headers)
            .with_fields(&fields)
            .with_file(&file_name),
    );
    if let Err(res) = authorize(&state, &headers) {
        return res;
    }
    if let Some(res) = take_failure(&state) {
        return res;
    }
    let mut guard = lock(&state);
    let Some(note) = guard.notes.iter_mut().find(|note| note.id == id) else {
        return message(StatusCode::NOT_FOUND, "Note not found");
    };
    note.title = fields.get("title").cloned().unwrap_or_default();
    note.content = fields.get("content").cloned().unwrap_or_default();
    note.tags = fields.get("tags").cloned().unwrap_or_default();
    if let Some(name) = file_name {
        note.file_url = Some(format!("/uploads/{}", name));
    }
    Json(note.clone()).into_response()
}

async fn delete_note(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    record(&state, RecordedRequest::new("DELETE", format!("/notes/{}", id), &headers));
    if let Err(res) = authorize(&state, &headers) {
        return res;
    }
    if let Some(res) = take_failure(&state) {
        return res;
    }
    let mut guard = lock(&state);
    let before = guard.notes.len();
    guard.notes.retain(|note| note.id != id);
    if guard.notes.len() == before {
        return message(StatusCode::NOT_FOUND, "Note not found");
    }
    message(StatusCode::OK, "Note deleted")
}

async fn search_notes(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let query = params.get("q").cloned().unwrap_or_default();
    record(&state, RecordedRequest::new("GET", "/search", &headers).with_query(&query));
    if let Err(res) = authorize(&state, &headers) {
        return res;
    }
    if let Some(res) = take_failure(&state) {
        return res;
    }
    let delay = lock(&state).search_delays.get(&query).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let needle = query.to_lowercase();
    let notes: Vec<Note> = lock(&state)
        .notes
        .iter()
        .filter(|note| {
            needle.is_empty()
                || note.title.to_lowercase().contains(&needle)
                || note.content.to_lowercase().contains(&needle)
                || note.tags.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();
    Json(notes).into_response()
}

async fn summarize(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let fields = json_fields(&body);
    record(&state, RecordedRequest::new("POST", "/summarize", &headers).with_fields(&fields));
    if let Err(res) = authorize(&state, &headers) {
        return res;
    }
    if let Some(res) = take_failure(&state) {
        return res;
    }
    let content = fields.get("content").cloned().unwrap_or_default();
    let summary = format!("Summary: {}", content.chars().take(40).collect::<String>());
    Json(json!({ "summary": summary })).into_response()
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/:id", put(update_note).delete(delete_note))
        .route("/search", get(search_notes))
        .route("/summarize", post(summarize))
        .with_state(state)
}

/// Running mock backend; shuts down when dropped.
pub struct MockBackend {
    state: Shared,
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl MockBackend {
    /// Start the mock on an ephemeral localhost port.
    ///
    /// # Panics
    /// Panics if the runtime or listener cannot be created.
    pub fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::default()));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let app = router(state.clone());

        let thread = thread::Builder::new()
            .name("notedeck-mock-backend".into())
            .spawn(move || {
                let rt = tokio::runtime::Builder::new_multi_thread()
                    .worker_threads(2)
                    .enable_all()
                    .build()
                    .expect("mock backend runtime");
                rt.block_on(async move {
                    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                        .await
                        .expect("bind mock backend");
                    let addr = listener.local_addr().expect("mock backend addr");
                    let _ = ready_tx.send(addr);
                    let _ = axum::serve(listener, app)
                        .with_graceful_shutdown(async {
                            let _ = shutdown_rx.await;
                        })
                        .await;
                });
            })
            .expect("spawn mock backend thread");

        let addr = ready_rx.recv().expect("mock backend ready");
        Self {
            state,
            addr,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Register a user directly, bypassing `/signup`.
    pub fn register_user(&self, email: &str, password: &str) {
        lock(&self.state)
            .users
            .insert(email.to_string(), password.to_string());
    }

    /// Issue a valid token without going through `/login`.
    pub fn issue_token(&self) -> String {
        let mut guard = lock(&self.state);
        guard.next_id += 1;
        let token = format!("token-{}", guard.next_id);
        guard.tokens.insert(token.clone(), "seeded@example.com".to_string());
        token
    }

    pub fn seed_note(&self, title: &str, content: &str, tags: &str) -> Note {
        let mut guard = lock(&self.state);
        guard.next_id += 1;
        let note = Note {
            id: format!("note-{}", guard.next_id),
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.to_string(),
            file_url: None,
        };
        guard.notes.push(note.clone());
        note
    }

    pub fn notes(&self) -> Vec<Note> {
        lock(&self.state).notes.clone()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    /// Requests matching `method` and `path`, in arrival order.
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|req| req.method == method && req.path == path)
            .collect()
    }

    /// Hold responses to `/search?q=<query>` for `delay`.
    pub fn delay_search(&self, query: &str, delay: Duration) {
        lock(&self.state)
            .search_delays
            .insert(query.to_string(), delay);
    }

    /// Fail the next authenticated request that passes the token check.
    pub fn fail_next(&self, status: u16, text: &str) {
        let status = StatusCode::from_u16(status).expect("valid status code");
        lock(&self.state).fail_next = Some((status, text.to_string()));
    }

    /// Invalidate every issued token.
    pub fn revoke_tokens(&self) {
        lock(&self.state).tokens.clear();
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}
