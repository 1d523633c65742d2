use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::auth::SessionClient;
use crate::configs::FlowsConfig;
use crate::flows::forms::{FlowCore, FlowStatus};
use crate::routes::{Navigator, Route};

pub const INVALID_ACTIVATION_LINK: &str = "Invalid activation link.";
pub const ACTIVATION_FAILED: &str = "Activation failed. Please try again.";

/// Runs once when the activation page opens.
pub struct ActivationFlow {
    session: Arc<SessionClient>,
    core: FlowCore,
}

impl ActivationFlow {
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

    /// Activates with the link parameters carried by `route`; any other
    /// route counts as a broken link.
    pub async fn activate_route(&self, route: &Route) -> FlowStatus {
        match route {
            Route::Activate { uid, token } => self.activate(uid, token).await,
            _ => self.core.reject(INVALID_ACTIVATION_LINK),
        }
    }

    pub async fn activate(&self, uid: &str, token: &str) -> FlowStatus {
        if uid.trim().is_empty() || token.trim().is_empty() {
            return self.core.reject(INVALID_ACTIVATION_LINK);
        }
        if !self.core.begin() {
            return FlowStatus::Submitting;
        }

        match self.session.activate_account(uid, token).await {
            Ok(message) => {
                let status = self.core.succeed(message);
                self.core.redirect_to_login();
                status
            }
            Err(e) => {
                debug!("Activation failed: {}", e);
                let message = e
                    .body()
                    .and_then(|b| b.error.as_deref())
                    .unwrap_or(ACTIVATION_FAILED);
                self.core.fail(message)
            }
        }
    }
}
