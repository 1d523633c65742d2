use std::sync::{Arc, OnceLock, Weak};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::{ApiRequest, ApiResponse, Endpoints, HttpTransport};
use crate::auth::SessionStore;
use crate::common::ApiError;

/// API paths that never carry a bearer credential.
pub const PUBLIC_ENDPOINTS: [&str; 4] = [
    "login/",
    "refresh/",
    "reset-password/",
    "reset-password-confirm/",
];

pub const REFRESH_PATH: &str = "refresh/";

/// Mints a new access token. Never fails from the caller's point of view;
/// the outcome is visible only through the session store.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self);
}

/// Authorizes every call to the API base and recovers from one expired
/// access token per request.
pub struct ApiClient {
    endpoints: Endpoints,
    transport: Arc<dyn HttpTransport>,
    session: SessionStore,
    refresher: OnceLock<Weak<dyn TokenRefresher>>,
}

impl ApiClient {
    pub fn new(
        endpoints: Endpoints,
        transport: Arc<dyn HttpTransport>,
        session: SessionStore,
    ) -> Self {
        Self {
            endpoints,
            transport,
            session,
            refresher: OnceLock::new(),
        }
    }

    /// Installs the refresher used after a 401. Only the first call has an
    /// effect.
    pub fn bind_refresher(&self, refresher: Weak<dyn TokenRefresher>) {
        if self.refresher.set(refresher).is_err() {
            warn!("Token refresher already bound; ignoring");
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        self.endpoints.api_url(path)
    }

    fn is_api(&self, url: &str) -> bool {
        url.starts_with(self.endpoints.api_base())
    }

    fn is_public(&self, url: &str) -> bool {
        let base = self.endpoints.api_base();
        PUBLIC_ENDPOINTS
            .iter()
            .any(|path| url.starts_with(&format!("{}{}", base, path)))
    }

    fn is_refresh_call(&self, url: &str) -> bool {
        url.starts_with(&self.url(REFRESH_PATH))
    }

    /// Sends `request` and returns the successful response.
    ///
    /// Requests outside the API base pass through untouched. API requests
    /// always carry cookies and carry the bearer token unless public. A 401
    /// on anything but the refresh call triggers one refresh; the request is
    /// then retried once if a token is available afterwards. Every other
    /// failure is returned as is.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        if !self.is_api(&request.url) {
            return self.transport.execute(&request).await?.into_result();
        }

        let public = self.is_public(&request.url);
        let bearer = if public {
            None
        } else {
            self.session.access_token()
        };
        let prepared = request.with_credentials().with_bearer(bearer);

        let response = self.transport.execute(&prepared).await?;
        if response.status != 401 || self.is_refresh_call(&prepared.url) {
            return response.into_result();
        }

        let original = ApiError::from_status(response.status, &response.body);
        let Some(refresher) = self.refresher.get().and_then(Weak::upgrade) else {
            debug!("401 from {} with no refresher bound", prepared.url);
            return Err(original);
        };

        debug!("401 from {}, refreshing session", prepared.url);
        refresher.refresh().await;

        let Some(token) = self.session.access_token() else {
            debug!("Refresh yielded no token; giving up on {}", prepared.url);
            return Err(original);
        };

        let retry = prepared.with_bearer(if public { None } else { Some(token) });
        self.transport.execute(&retry).await?.into_result()
    }
}
