use std::sync::Arc;

use tracing::debug;

use crate::auth::SessionClient;
use crate::routes::{Navigator, Route};

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allow,
    /// Entry refused; the user has been sent to the login page.
    Redirected,
}

impl Admission {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Gate in front of protected routes.
pub struct RouteGuard {
    session: Arc<SessionClient>,
    navigator: Arc<dyn Navigator>,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionClient>, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    /// Admits `route` directly when it is public, otherwise runs [`Self::admit`].
    pub async fn enter(&self, route: &Route) -> Admission {
        if route.is_protected() {
            self.admit().await
        } else {
            Admission::Allow
        }
    }

    /// With a token in hand, probe `me/`; without one, refresh first. Any
    /// failure, or an unauthenticated session afterwards, redirects to the
    /// login page exactly once.
    pub async fn admit(&self) -> Admission {
        if self.session.access_token().is_none() {
            debug!("No access token, refreshing before admission");
            self.session.refresh().await;
        }

        if let Err(e) = self.session.check_auth().await {
            debug!("Admission denied: {}", e);
            return self.deny();
        }

        if self.session.is_authenticated() {
            Admission::Allow
        } else {
            self.deny()
        }
    }

    fn deny(&self) -> Admission {
        self.navigator.navigate(Route::LogIn);
        Admission::Redirected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiResponse, Method};
    use crate::auth::session::tests::session;
    use crate::common::VideoId;
    use crate::testing::{MockTransport, RecordingNavigator};
    use serde_json::json;

    fn guard(transport: Arc<MockTransport>) -> (RouteGuard, Arc<SessionClient>, Arc<RecordingNavigator>) {
        let navigator = RecordingNavigator::new();
        let session = session(transport, navigator.clone());
        (
            RouteGuard::new(session.clone(), navigator.clone()),
            session,
            navigator,
        )
    }

    #[tokio::test]
    async fn test_valid_session_is_admitted_twice_without_redirect() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::Post, "login/", vec![ApiResponse::json(200, &json!({"access": "t"}))]);
        transport.respond(
            Method::Get,
            "me/",
            vec![ApiResponse::json(200, &json!({})), ApiResponse::json(200, &json!({}))],
        );
        let (guard, session, navigator) = guard(transport.clone());
        session.login("a@b.de", "pw").await.unwrap();

        assert_eq!(guard.admit().await, Admission::Allow);
        assert_eq!(guard.admit().await, Admission::Allow);

        assert!(navigator.routes().is_empty());
        assert_eq!(transport.count(Method::Get, "me/"), 2);
        assert_eq!(transport.count(Method::Post, "refresh/"), 0);
    }

    #[tokio::test]
    async fn test_missing_token_refreshes_then_checks() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::Post, "refresh/", vec![ApiResponse::json(200, &json!({"access": "t"}))]);
        transport.respond(Method::Get, "me/", vec![ApiResponse::json(200, &json!({}))]);
        let (guard, session, navigator) = guard(transport.clone());

        assert_eq!(guard.admit().await, Admission::Allow);
        assert!(session.is_authenticated());
        assert!(navigator.routes().is_empty());

        let sent = transport.requests();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].url.ends_with("refresh/"));
        assert_eq!(sent[1].bearer.as_deref(), Some("t"));
    }

    #[tokio::test]
    async fn test_failed_refresh_redirects_once() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::Post, "refresh/", vec![ApiResponse::new(401, "")]);
        transport.respond(Method::Get, "me/", vec![ApiResponse::new(401, "")]);
        let (guard, session, navigator) = guard(transport.clone());

        assert_eq!(guard.admit().await, Admission::Redirected);
        assert!(!session.is_authenticated());
        assert_eq!(navigator.routes(), vec![Route::LogIn]);
        // the 401 on me/ triggers one more silent refresh, which also fails,
        // so me/ is never retried
        assert_eq!(transport.count(Method::Post, "refresh/"), 2);
        assert_eq!(transport.count(Method::Get, "me/"), 1);
    }

    #[tokio::test]
    async fn test_network_failure_redirects() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::Post, "login/", vec![ApiResponse::json(200, &json!({"access": "t"}))]);
        transport.fail(Method::Get, "me/");
        let (guard, session, navigator) = guard(transport);
        session.login("a@b.de", "pw").await.unwrap();

        assert_eq!(guard.admit().await, Admission::Redirected);
        assert_eq!(navigator.routes(), vec![Route::LogIn]);
    }

    #[tokio::test]
    async fn test_public_routes_skip_the_check() {
        let transport = Arc::new(MockTransport::new());
        let (guard, _session, navigator) = guard(transport.clone());

        assert!(guard.enter(&Route::SignUp).await.is_allowed());
        assert!(transport.requests().is_empty());

        assert_eq!(
            guard.enter(&Route::Video { id: VideoId(3) }).await,
            Admission::Redirected
        );
        assert_eq!(navigator.routes(), vec![Route::LogIn]);
    }
}
