//! Login, signup and logout flows plus dashboard mount gating.

use super::{AuthForm, DashboardPhase, NoteDeckApp, Route};
use crate::backend::{CoreCmd, CoreErrorSource};
use notedeck_core::{
    ApiError, Credentials, Session, CONNECTION_ERROR_MESSAGE, LOGIN_FAILED_MESSAGE,
    SIGNUP_FAILED_MESSAGE,
};
use tracing::{info, warn};

pub(super) const SIGNUP_SUCCESS_MESSAGE: &str = "Signup successful! Please log in.";
pub(super) const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

impl NoteDeckApp {
    pub(super) fn submit_login(&mut self) {
        if self.login_form.submitting {
            return;
        }
        let credentials = Credentials::new(
            self.login_form.email.trim(),
            self.login_form.password.clone(),
        );
        if let Err(message) = credentials.validate() {
            self.login_form.error = Some(message.to_string());
            return;
        }
        self.login_form.error = None;
        if self.send_cmd(CoreCmd::Login { credentials }) {
            self.login_form.submitting = true;
        } else {
            self.login_form.error = Some(CONNECTION_ERROR_MESSAGE.to_string());
        }
    }

    pub(super) fn submit_signup(&mut self) {
        if self.signup_form.submitting {
            return;
        }
        let credentials = Credentials::new(
            self.signup_form.email.trim(),
            self.signup_form.password.clone(),
        );
        if let Err(message) = credentials.validate() {
            self.signup_form.error = Some(message.to_string());
            return;
        }
        self.signup_form.error = None;
        if self.send_cmd(CoreCmd::Signup { credentials }) {
            self.signup_form.submitting = true;
        } else {
            self.signup_form.error = Some(CONNECTION_ERROR_MESSAGE.to_string());
        }
    }

    /// Persist the new session and enter the dashboard.
    ///
    /// A session that cannot be written is still used for this run; the user
    /// only loses it on restart.
    pub(super) fn on_logged_in(&mut self, session: Session) {
        self.login_form = AuthForm::default();
        if let Err(err) = self.session_store.save(&session) {
            warn!("failed to persist session: {}", err);
            self.set_status(format!("Logged in, but the session was not saved: {}", err));
        }
        self.session = Some(session);
        self.navigate(Route::Dashboard);
    }

    pub(super) fn on_signed_up(&mut self) {
        self.signup_form = AuthForm::default();
        self.set_status(SIGNUP_SUCCESS_MESSAGE);
        self.navigate(Route::Login);
    }

    pub(super) fn on_auth_failed(&mut self, source: &CoreErrorSource, error: &ApiError) {
        let (form, fallback) = match source {
            CoreErrorSource::Login => (&mut self.login_form, LOGIN_FAILED_MESSAGE),
            CoreErrorSource::Signup => (&mut self.signup_form, SIGNUP_FAILED_MESSAGE),
            _ => return,
        };
        form.submitting = false;
        form.error = Some(error.auth_message(fallback));
    }

    /// Drop the session locally; the server keeps no logout state.
    pub(super) fn logout(&mut self) {
        self.clear_session();
        self.login_form = AuthForm::default();
        self.set_status("Logged out");
        self.navigate(Route::Login);
    }

    /// Dashboard mount: gate on the session, then load the list.
    pub(super) fn mount_dashboard(&mut self) {
        self.dashboard.reset();
        if self.session.is_none() {
            info!("no session; redirecting to login");
            self.route = Route::Login;
            return;
        }
        self.dashboard.phase = DashboardPhase::Loading;
        self.request_fetch();
    }

    /// The server rejected the token: forget it and return to login.
    pub(super) fn force_relogin(&mut self) {
        warn!("session rejected by server; logging out");
        self.clear_session();
        self.login_form.submitting = false;
        self.login_form.error = Some(SESSION_EXPIRED_MESSAGE.to_string());
        self.navigate(Route::Login);
    }

    fn clear_session(&mut self) {
        if let Err(err) = self.session_store.clear() {
            warn!("failed to remove stored session: {}", err);
        }
        self.session = None;
        self.dashboard.reset();
    }
}
