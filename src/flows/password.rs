use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::auth::SessionClient;
use crate::configs::FlowsConfig;
use crate::flows::forms::{FlowCore, FlowStatus, require, validate_passwords};
use crate::routes::{Navigator, Route};

pub const RESET_EMAIL_SENT: &str =
    "If an account exists for this address, we have sent you an email with further instructions.";
pub const PASSWORD_RESET: &str = "Your password has been reset.";
pub const RESET_FAILED: &str = "Something went wrong. Please try again.";

/// "Forgot password" page. The outcome never reveals whether the address
/// belongs to an account.
pub struct ForgotPasswordFlow {
    session: Arc<SessionClient>,
    core: FlowCore,
}

impl ForgotPasswordFlow {
    pub fn new(session: Arc<SessionClient>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            session,
            core: FlowCore::new(navigator, Duration::ZERO),
        }
    }

    pub fn status(&self) -> FlowStatus {
        self.core.status()
    }

    pub fn watch(&self) -> watch::Receiver<FlowStatus> {
        self.core.watch()
    }

    pub async fn submit(&self, email: &str) -> FlowStatus {
        if let Err(e) = require(&[email]) {
            return self.core.reject(e.to_string());
        }
        if !self.core.begin() {
            return FlowStatus::Submitting;
        }
        if let Err(e) = self.session.reset_password(email.trim()).await {
            debug!("Password reset request failed: {}", e);
        }
        self.core.succeed(RESET_EMAIL_SENT)
    }
}

/// "Choose a new password" page, opened from the emailed link.
pub struct ResetPasswordFlow {
    session: Arc<SessionClient>,
    core: FlowCore,
    uid: String,
    token: String,
}

impl ResetPasswordFlow {
    pub fn new(
        session: Arc<SessionClient>,
        navigator: Arc<dyn Navigator>,
        config: &FlowsConfig,
        uid: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            session,
            core: FlowCore::new(navigator, Duration::from_millis(config.redirect_delay_ms)),
            uid: uid.into(),
            token: token.into(),
        }
    }

    /// Takes the link parameters from a reset route; other routes yield
    /// empty parameters and every submission then fails.
    pub fn for_route(
        session: Arc<SessionClient>,
        navigator: Arc<dyn Navigator>,
        config: &FlowsConfig,
        route: &Route,
    ) -> Self {
        let (uid, token) = match route {
            Route::ResetPassword { uid, token } => (uid.as_str(), token.as_str()),
            _ => ("", ""),
        };
        Self::new(session, navigator, config, uid, token)
    }

    pub fn status(&self) -> FlowStatus {
        self.core.status()
    }

    pub fn watch(&self) -> watch::Receiver<FlowStatus> {
        self.core.watch()
    }

    pub async fn submit(&self, password: &str, confirm_password: &str) -> FlowStatus {
        if let Err(e) = validate_passwords(password, confirm_password) {
            return self.core.reject(e.to_string());
        }
        if !self.core.begin() {
            return FlowStatus::Submitting;
        }

        match self
            .session
            .reset_password_confirm(&self.uid, &self.token, password, confirm_password)
            .await
        {
            Ok(_) => {
                let status = self.core.succeed(PASSWORD_RESET);
                self.core.redirect_to_login();
                status
            }
            Err(e) => {
                let body = e.body();
                let message = body
                    .and_then(|b| b.message.as_deref())
                    .or_else(|| body.and_then(|b| b.error.as_deref()))
                    .unwrap_or(RESET_FAILED);
                self.core.fail(message)
            }
        }
    }
}
