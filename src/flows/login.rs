use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::auth::SessionClient;
use crate::flows::forms::{FlowCore, FlowStatus, require};
use crate::routes::{Navigator, Route};

pub const LOGIN_FAILED: &str = "Login failed. Please check your email and password.";

pub struct LoginFlow {
    session: Arc<SessionClient>,
    core: FlowCore,
}

impl LoginFlow {
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

    /// Logs in and opens the catalog. A failure stays on the page with the
    /// backend's message.
    pub async fn submit(&self, email: &str, password: &str) -> FlowStatus {
        if let Err(e) = require(&[email, password]) {
            return self.core.reject(e.to_string());
        }
        if !self.core.begin() {
            return FlowStatus::Submitting;
        }

        match self.session.login(email.trim(), password).await {
            Ok(()) => {
                let status = self.core.succeed("");
                self.core.navigate(Route::Catalog);
                status
            }
            Err(e) => {
                debug!("Login rejected: {}", e);
                let message = e.body().and_then(|b| b.message()).unwrap_or(LOGIN_FAILED);
                self.core.fail(message)
            }
        }
    }
}
