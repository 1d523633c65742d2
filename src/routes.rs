//! Navigation surface of the client.
//!
//! Rendering lives elsewhere; this module only names the places the core can
//! send the user to and which of them need a session.

use std::fmt;

use crate::common::VideoId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Start,
    LogIn,
    SignUp,
    Activate { uid: String, token: String },
    ForgotPassword,
    ResetPassword { uid: String, token: String },
    /// Authenticated catalog view.
    Catalog,
    /// Player for a single video.
    Video { id: VideoId },
    Imprint,
    PrivacyPolicy,
}

impl Route {
    /// Parses an application path such as `/video/12`.
    ///
    /// Parameterised routes with missing segments parse with empty
    /// parameters so that the owning flow can report an invalid link.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let param = |i: usize| segments.get(i).map(|s| s.to_string()).unwrap_or_default();

        match segments.first().copied() {
            None => Some(Self::Start),
            Some("log-in") if segments.len() == 1 => Some(Self::LogIn),
            Some("sign-up") if segments.len() == 1 => Some(Self::SignUp),
            Some("forgot-password") if segments.len() == 1 => Some(Self::ForgotPassword),
            Some("videoflix") if segments.len() == 1 => Some(Self::Catalog),
            Some("imprint") if segments.len() == 1 => Some(Self::Imprint),
            Some("privacy-policy") if segments.len() == 1 => Some(Self::PrivacyPolicy),
            Some("activate") if segments.len() <= 3 => Some(Self::Activate {
                uid: param(1),
                token: param(2),
            }),
            Some("reset-password") if segments.len() <= 3 => Some(Self::ResetPassword {
                uid: param(1),
                token: param(2),
            }),
            Some("video") if segments.len() == 2 => segments[1]
                .parse::<u64>()
                .ok()
                .map(|id| Self::Video { id: VideoId(id) }),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Start => "/".to_string(),
            Self::LogIn => "/log-in".to_string(),
            Self::SignUp => "/sign-up".to_string(),
            Self::Activate { uid, token } => format!("/activate/{}/{}", uid, token),
            Self::ForgotPassword => "/forgot-password".to_string(),
            Self::ResetPassword { uid, token } => format!("/reset-password/{}/{}", uid, token),
            Self::Catalog => "/videoflix".to_string(),
            Self::Video { id } => format!("/video/{}", id),
            Self::Imprint => "/imprint".to_string(),
            Self::PrivacyPolicy => "/privacy-policy".to_string(),
        }
    }

    /// Routes gated by the admission guard.
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Catalog | Self::Video { .. })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Performs navigation on behalf of the core.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that only records the request in the log. Used by the binary,
/// which has no view layer.
#[derive(Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: Route) {
        tracing::info!("Navigate -> {}", route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_paths() {
        assert_eq!(Route::parse("/"), Some(Route::Start));
        assert_eq!(Route::parse("/log-in"), Some(Route::LogIn));
        assert_eq!(Route::parse("/videoflix/"), Some(Route::Catalog));
        assert_eq!(
            Route::parse("/video/42"),
            Some(Route::Video { id: VideoId(42) })
        );
        assert_eq!(
            Route::parse("/activate/abc/xyz"),
            Some(Route::Activate {
                uid: "abc".into(),
                token: "xyz".into()
            })
        );
        assert_eq!(
            Route::parse("/reset-password/MQ/set-token?x=1"),
            Some(Route::ResetPassword {
                uid: "MQ".into(),
                token: "set-token".into()
            })
        );
    }

    #[test]
    fn test_parse_rejects_unknown_and_non_numeric() {
        assert_eq!(Route::parse("/video/abc"), None);
        assert_eq!(Route::parse("/nowhere"), None);
        assert_eq!(Route::parse("/log-in/extra"), None);
    }

    #[test]
    fn test_activation_with_missing_segments_keeps_empty_params() {
        assert_eq!(
            Route::parse("/activate/abc"),
            Some(Route::Activate {
                uid: "abc".into(),
                token: String::new()
            })
        );
    }

    #[test]
    fn test_protected_routes() {
        assert!(Route::Catalog.is_protected());
        assert!(Route::Video { id: VideoId(1) }.is_protected());
        assert!(!Route::LogIn.is_protected());
        assert!(!Route::Start.is_protected());
    }

    #[test]
    fn test_path_round_trip_for_video() {
        let route = Route::Video { id: VideoId(7) };
        assert_eq!(Route::parse(&route.path()), Some(route));
    }
}
