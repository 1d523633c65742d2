use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::routes::{Navigator, Route};

/// A navigation that fires after a delay unless cancelled first.
///
/// Dropping the handle cancels it, so a redirect never outlives the view
/// that scheduled it. Must be created inside a tokio runtime.
pub struct Redirect {
    cancel: CancellationToken,
}

impl Redirect {
    pub fn schedule(navigator: Arc<dyn Navigator>, route: Route, delay: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => debug!("Redirect to {} cancelled", route),
                _ = tokio::time::sleep(delay) => navigator.navigate(route),
            }
        });
        Self { cancel }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for Redirect {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
