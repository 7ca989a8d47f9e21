//! Async client for the notes HTTP API.
//!
//! Every call is an independent request/response round trip. Authenticated
//! calls take the [`Session`] explicitly; the client never reads the session
//! store itself.

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    Credentials, LoginResponse, Note, NoteDraft, SaveTarget, SummaryRequest, SummaryResponse,
};
use crate::session::Session;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};


/// Shared HTTP client bound to one API base URL.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth_scheme: Option<String>,
}

/// Build an endpoint URL by appending percent-encoded path segments to `base`.
///
/// Any path already present on `base` is kept as a prefix.
///
/// # Errors
/// Returns [`ApiError::InvalidUrl`] when `base` cannot serve as an API base.
pub fn api_url(base: &str, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url =
        Url::parse(base).map_err(|err| ApiError::InvalidUrl(format!("'{}': {}", base, err)))?;
    let mut path = url
        .path_segments_mut()
        .map_err(|_| ApiError::InvalidUrl(format!("'{}' cannot be used as an API base", base)))?;
    path.pop_if_empty();
    for segment in segments {
        path.push(segment);
    }
    drop(path);
    Ok(url)
}

/// Pick the most useful message out of an error response body.
///
/// Prefers a JSON `message` field, then `error`, then the raw body, then the
/// canonical status reason.
pub fn error_message_for_response(status: StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(message) = value.get(key).and_then(Value::as_str) {
                if !message.trim().is_empty() {
                    return message.to_string();
                }
            }
        }
    }

    body.trim().to_string()
}

/// Turn a non-2xx response into an [`ApiError`].
///
/// For authenticated calls 401/403 map to [`ApiError::Unauthorized`]; on the
/// login and signup endpoints they carry the server message instead.
async fn ensure_success(res: Response, authenticated: bool) -> Result<Response, ApiError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    if authenticated && matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return Err(ApiError::Unauthorized);
    }

    let body = match res.text().await {
        Ok(body) => body,
        Err(err) => format!("failed to read error response body: {}", err),
    };
    Err(ApiError::Status {
        status: status.as_u16(),
        message: error_message_for_response(status, &body),
    })
}

async fn note_form(draft: &NoteDraft) -> Result<Form, ApiError> {
    let mut form = Form::new()
        .text("title", draft.title.clone())
        .text("content", draft.content.clone())
        .text("tags", draft.tags.clone());
    if let Some(path) = draft.attachment.as_deref() {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| ApiError::Io(format!("{}: {}", path.display(), err)))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "attachment".to_string());
        form = form.part("file", Part::bytes(bytes).file_name(file_name));
    }
    Ok(form)
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    /// Returns an error when the base URL is invalid or the HTTP client cannot
    /// be constructed.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        api_url(&config.api_url, &[])?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            auth_scheme: config.auth_scheme.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        api_url(&self.base_url, segments)
    }

    fn authorized(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        request.header(
            AUTHORIZATION,
            session.authorization_value(self.auth_scheme.as_deref()),
        )
    }

    async fn send(
        &self,
        request: RequestBuilder,
        action: &str,
        authenticated: bool,
    ) -> Result<Response, ApiError> {
        let res = request.send().await.map_err(|err| {
            warn!("{} request failed: {}", action, err);
            ApiError::from(err)
        })?;
        debug!("{} -> {}", action, res.status());
        ensure_success(res, authenticated).await.inspect_err(|err| {
            warn!("{} rejected: {}", action, err);
        })
    }

    /// `POST /signup`.
    ///
    /// # Errors
    /// Returns [`ApiError::Status`] with the server message when registration
    /// is refused, or [`ApiError::Network`] when the server is unreachable.
    pub async fn signup(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let request = self.http.post(self.endpoint(&["signup"])?).json(credentials);
        self.send(request, "signup", false).await?;
        Ok(())
    }

    /// `POST /login`, returning the issued session.
    ///
    /// # Errors
    /// Returns [`ApiError::Status`] for rejected credentials and
    /// [`ApiError::Decode`] when the response carries no usable token.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let request = self.http.post(self.endpoint(&["login"])?).json(credentials);
        let res = self.send(request, "login", false).await?;
        let body: LoginResponse = res.json().await?;
        Session::new(body.token).map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// `GET /notes`.
    ///
    /// # Errors
    /// Returns [`ApiError::Unauthorized`] when the session is rejected.
    pub async fn list_notes(&self, session: &Session) -> Result<Vec<Note>, ApiError> {
        let request = self.authorized(self.http.get(self.endpoint(&["notes"])?), session);
        let res = self.send(request, "list notes", true).await?;
        Ok(res.json().await?)
    }

    /// `GET /search?q=`.
    ///
    /// # Errors
    /// Returns [`ApiError::Unauthorized`] when the session is rejected.
    pub async fn search_notes(
        &self,
        session: &Session,
        query: &str,
    ) -> Result<Vec<Note>, ApiError> {
        let request = self
            .http
            .get(self.endpoint(&["search"])?)
            .query(&[("q", query)]);
        let res = self
            .send(self.authorized(request, session), "search notes", true)
            .await?;
        Ok(res.json().await?)
    }

    /// `POST /notes` or `PUT /notes/{id}` with a multipart body.
    ///
    /// The response body is ignored; callers re-fetch the list.
    ///
    /// # Errors
    /// Returns [`ApiError::Io`] when the attachment cannot be read, otherwise
    /// the request failure.
    pub async fn save_note(
        &self,
        session: &Session,
        target: &SaveTarget,
        draft: &NoteDraft,
    ) -> Result<(), ApiError> {
        let form = note_form(draft).await?;
        let request = match target {
            SaveTarget::Create => self.http.post(self.endpoint(&["notes"])?),
            SaveTarget::Update { id } => self.http.put(self.endpoint(&["notes", id.as_str()])?),
        };
        let action = match target {
            SaveTarget::Create => "create note",
            SaveTarget::Update { .. } => "update note",
        };
        self.send(self.authorized(request.multipart(form), session), action, true)
            .await?;
        Ok(())
    }

    /// `DELETE /notes/{id}`.
    ///
    /// # Errors
    /// Returns the request failure.
    pub async fn delete_note(&self, session: &Session, id: &str) -> Result<(), ApiError> {
        let request = self.authorized(self.http.delete(self.endpoint(&["notes", id])?), session);
        self.send(request, "delete note", true).await?;
        Ok(())
    }

    /// `POST /summarize`, returning the generated summary.
    ///
    /// # Errors
    /// Returns the request failure or [`ApiError::Decode`] for a malformed body.
    pub async fn summarize(&self, session: &Session, content: &str) -> Result<String, ApiError> {
        let body = SummaryRequest {
            content: content.to_string(),
        };
        let request = self.authorized(
            self.http.post(self.endpoint(&["summarize"])?).json(&body),
            session,
        );
        let res = self.send(request, "summarize", true).await?;
        let body: SummaryResponse = res.json().await?;
        Ok(body.summary)
    }
}
