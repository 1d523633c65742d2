use std::sync::{Arc, Weak};

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiRequest, MessageResponse, TokenRefresher, TokenResponse};
use crate::auth::{SessionStore, SessionWriter};
use crate::common::{AccessToken, ApiError};
use crate::routes::{Navigator, Route};

/// Account and session operations against the backend.
///
/// The only holder of the session's write side: every change to the access
/// token or the authenticated flag is the outcome of one of these calls.
pub struct SessionClient {
    api: Arc<ApiClient>,
    writer: SessionWriter,
    navigator: Arc<dyn Navigator>,
}

impl SessionClient {
    /// Creates the client and registers it as the layer's token refresher.
    pub fn new(
        api: Arc<ApiClient>,
        writer: SessionWriter,
        navigator: Arc<dyn Navigator>,
    ) -> Arc<Self> {
        let client = Arc::new(Self {
            api,
            writer,
            navigator,
        });
        let refresher: Weak<SessionClient> = Arc::downgrade(&client);
        client.api.bind_refresher(refresher);
        client
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn store(&self) -> &SessionStore {
        self.api.session()
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        self.store().access_token()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store().is_authenticated()
    }

    /// On failure the session is left as it was.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let request = ApiRequest::post(
            self.api.url("login/"),
            json!({ "email": email, "password": password }),
        );
        let token: TokenResponse = self.api.send(request).await?.decode()?;
        self.writer.establish(AccessToken::from(token.access));
        info!("Logged in");
        Ok(())
    }

    /// Swaps the refresh cookie for a new access token.
    ///
    /// Failures are absorbed: the session is cleared and nothing is
    /// returned, so callers only ever look at the resulting state.
    pub async fn refresh(&self) {
        let request = ApiRequest::post(self.api.url("refresh/"), json!({}));
        let result = match self.api.send(request).await {
            Ok(response) => response.decode::<TokenResponse>(),
            Err(e) => Err(e),
        };

        match result {
            Ok(token) => {
                self.writer.establish(AccessToken::from(token.access));
                debug!("Session refreshed");
            }
            Err(e) => {
                self.writer.clear();
                warn!("Token refresh failed: {}", e);
            }
        }
    }

    /// Ends the session on the server, then locally, then sends the user to
    /// the login page.
    ///
    /// Local state is dropped even if the server call fails; the error is
    /// still returned.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self
            .api
            .send(ApiRequest::post(self.api.url("logout/"), json!({})))
            .await;

        if let Err(e) = &result {
            warn!("Logout request failed: {}", e);
        }
        self.writer.clear();
        self.navigator.navigate(Route::LogIn);
        info!("Logged out");
        result.map(|_| ())
    }

    /// "Who am I" probe. Sets the authenticated flag from the outcome and
    /// returns the error, if any, unchanged.
    pub async fn check_auth(&self) -> Result<(), ApiError> {
        match self.api.send(ApiRequest::get(self.api.url("me/"))).await {
            Ok(_) => {
                self.writer.set_authenticated(true);
                Ok(())
            }
            Err(e) => {
                self.writer.set_authenticated(false);
                Err(e)
            }
        }
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<String, ApiError> {
        let request = ApiRequest::post(
            self.api.url("register/"),
            json!({
                "email": email,
                "password": password,
                "confirm_password": confirm_password,
            }),
        );
        let message: MessageResponse = self.api.send(request).await?.decode()?;
        Ok(message.message)
    }

    /// Activates an account from the emailed link. Empty parameters are
    /// rejected before any network call.
    pub async fn activate_account(&self, uid: &str, token: &str) -> Result<String, ApiError> {
        if uid.trim().is_empty() || token.trim().is_empty() {
            return Err(ApiError::InvalidLink("activation link is missing uid or token"));
        }
        let url = self.api.url(&format!(
            "activate/{}/{}/",
            urlencoding::encode(uid),
            urlencoding::encode(token)
        ));
        let message: MessageResponse = self.api.send(ApiRequest::get(url)).await?.decode()?;
        Ok(message.message)
    }

    pub async fn reset_password(&self, email: &str) -> Result<(), ApiError> {
        let request = ApiRequest::post(self.api.url("reset-password/"), json!({ "email": email }));
        self.api.send(request).await?;
        Ok(())
    }

    pub async fn reset_password_confirm(
        &self,
        uid: &str,
        token: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<String, ApiError> {
        if uid.trim().is_empty() || token.trim().is_empty() {
            return Err(ApiError::InvalidLink("reset link is missing uid or token"));
        }
        let request = ApiRequest::post(
            self.api.url("reset-password-confirm/"),
            json!({
                "uid": uid,
                "token": token,
                "new_password1": password,
                "new_password2": confirm_password,
            }),
        );
        let message: MessageResponse = self.api.send(request).await?.decode()?;
        Ok(message.message)
    }
}

#[async_trait]
impl TokenRefresher for SessionClient {
    async fn refresh(&self) {
        SessionClient::refresh(self).await;
    }
}
