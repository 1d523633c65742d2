use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::auth::SessionClient;
use crate::common::ApiError;
use crate::configs::FlowsConfig;
use crate::flows::forms::{
    FieldError, FlowCore, FlowStatus, MIN_PASSWORD_LEN, validate_email, validate_passwords,
};
use crate::routes::Navigator;

pub const SIGNUP_FAILED: &str = "Please check your input and try again.";

pub struct SignUpFlow {
    session: Arc<SessionClient>,
    core: FlowCore,
}

impl SignUpFlow {
    pub fn new(
        session: Arc<SessionClient>,
        navigator: Arc<dyn Navigator>,
        config: &FlowsConfig,
    ) -> Self {
        Self {
            session,
            core: FlowCore::new(navigator, Duration::from_millis(config.redirect_delay_ms)),
        }
    }

    pub fn status(&self) -> FlowStatus {
        self.core.status()
    }

    pub fn watch(&self) -> watch::Receiver<FlowStatus> {
        self.core.watch()
    }

    /// Registers the account. On success the backend's message is shown and
    /// the login page follows after the redirect delay. Ignored while a
    /// previous submission is still running.
    pub async fn submit(&self, email: &str, password: &str, confirm_password: &str) -> FlowStatus {
        if let Err(e) = validate(email, password, confirm_password) {
            return self.core.reject(e.to_string());
        }
        if !self.core.begin() {
            return FlowStatus::Submitting;
        }

        match self
            .session
            .register(email.trim(), password, confirm_password)
            .await
        {
            Ok(message) => {
                let status = self.core.succeed(message);
                self.core.redirect_to_login();
                status
            }
            Err(e) => self.core.fail(failure_message(&e)),
        }
    }
}

fn validate(email: &str, password: &str, confirm: &str) -> Result<(), FieldError> {
    validate_email(email)?;
    validate_passwords(password, confirm)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FieldError::PasswordTooShort);
    }
    Ok(())
}

fn failure_message(error: &ApiError) -> String {
    let body = error.body();
    body.and_then(|b| b.email.first())
        .or_else(|| body.and_then(|b| b.confirm_password.first()))
        .map(String::as_str)
        .unwrap_or(SIGNUP_FAILED)
        .to_string()
}
