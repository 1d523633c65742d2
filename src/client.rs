use std::sync::Arc;

use tracing::info;

use crate::api::{ApiClient, Endpoints, HttpTransport, RuntimeEnv};
use crate::auth::{Admission, RouteGuard, SessionClient, SessionStore};
use crate::catalog::CatalogService;
use crate::configs::Config;
use crate::flows::{
    ActivationFlow, ForgotPasswordFlow, LoginFlow, ResetPasswordFlow, SignUpFlow,
};
use crate::playback::{EngineFactory, PlaybackController, PlayerMode};
use crate::routes::{Navigator, Route};

/// The client core with all services wired together.
pub struct Videoflix {
    config: Config,
    session: Arc<SessionClient>,
    guard: RouteGuard,
    catalog: CatalogService,
    navigator: Arc<dyn Navigator>,
}

impl Videoflix {
    /// Resolves endpoints from `config` and the process environment.
    pub fn new(
        config: Config,
        transport: Arc<dyn HttpTransport>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let endpoints = Endpoints::resolve(&RuntimeEnv::detect(&config.api));
        Self::with_endpoints(config, endpoints, transport, navigator)
    }

    pub fn with_endpoints(
        config: Config,
        endpoints: Endpoints,
        transport: Arc<dyn HttpTransport>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        info!(
            "API base {}, media origin {}",
            endpoints.api_base(),
            endpoints.media_origin()
        );
        let (store, writer) = SessionStore::new();
        let api = Arc::new(ApiClient::new(endpoints, transport, store));
        let session = SessionClient::new(api.clone(), writer, navigator.clone());

        Self {
            guard: RouteGuard::new(session.clone(), navigator.clone()),
            catalog: CatalogService::new(api),
            config,
            session,
            navigator,
        }
    }

    /// Silent refresh on application start so a returning user with a valid
    /// refresh cookie is signed in without seeing the login page. Returns
    /// whether a session exists afterwards.
    pub async fn startup(&self) -> bool {
        self.session.refresh().await;
        let restored = self.session.access_token().is_some();
        if restored {
            info!("Session restored");
        } else {
            info!("No previous session");
        }
        restored
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn endpoints(&self) -> &Endpoints {
        self.session.api().endpoints()
    }

    pub fn store(&self) -> &SessionStore {
        self.session.store()
    }

    pub fn session(&self) -> &Arc<SessionClient> {
        &self.session
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub async fn enter(&self, route: &Route) -> Admission {
        self.guard.enter(route).await
    }

    pub fn login_flow(&self) -> LoginFlow {
        LoginFlow::new(self.session.clone(), self.navigator.clone())
    }

    pub fn sign_up_flow(&self) -> SignUpFlow {
        SignUpFlow::new(self.session.clone(), self.navigator.clone(), &self.config.flows)
    }

    pub fn activation_flow(&self) -> ActivationFlow {
        ActivationFlow::new(self.session.clone(), self.navigator.clone(), &self.config.flows)
    }

    pub fn forgot_password_flow(&self) -> ForgotPasswordFlow {
        ForgotPasswordFlow::new(self.session.clone(), self.navigator.clone())
    }

    pub fn reset_password_flow(&self, route: &Route) -> ResetPasswordFlow {
        ResetPasswordFlow::for_route(
            self.session.clone(),
            self.navigator.clone(),
            &self.config.flows,
            route,
        )
    }

    pub fn player(&self, mode: PlayerMode, factory: Arc<dyn EngineFactory>) -> PlaybackController {
        PlaybackController::new(
            mode,
            factory,
            self.endpoints().clone(),
            self.config.player.clone(),
        )
    }
}
