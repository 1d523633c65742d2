use reqwest::Url;

use crate::configs::ApiConfig;

/// Environment variable holding the runtime API base override.
pub const API_BASE_ENV: &str = "VIDEOFLIX_API_BASE_URL";
/// Environment variable naming the origin the client is served from.
pub const ORIGIN_ENV: &str = "VIDEOFLIX_ORIGIN";

const LOCAL_API_BASE: &str = "http://localhost:8000/api/";
const LOCAL_MEDIA_ORIGIN: &str = "http://localhost:8000/";
const API_SUFFIX: &str = "/api/";

/// Inputs of endpoint resolution, captured once at start-up.
///
/// `RuntimeEnv::default()` describes a process with no override and no
/// serving origin, which resolves to the local development backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeEnv {
    pub api_override: Option<String>,
    pub origin: Option<String>,
}

impl RuntimeEnv {
    /// Environment variables take precedence over the config file.
    pub fn detect(config: &ApiConfig) -> Self {
        Self::from_sources(
            config,
            std::env::var(API_BASE_ENV).ok(),
            std::env::var(ORIGIN_ENV).ok(),
        )
    }

    pub fn from_sources(
        config: &ApiConfig,
        env_override: Option<String>,
        env_origin: Option<String>,
    ) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            api_override: non_empty(env_override).or_else(|| non_empty(config.base_url.clone())),
            origin: non_empty(env_origin).or_else(|| non_empty(config.origin.clone())),
        }
    }
}

fn with_trailing_slash(url: &str) -> String {
    let url = url.trim();
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

/// Serialised origin (`scheme://host[:port]`) when `origin` names a
/// non-local host.
fn remote_origin(origin: Option<&str>) -> Option<String> {
    let url = Url::parse(origin?.trim()).ok()?;
    let host = url.host_str()?;
    if matches!(host, "localhost" | "127.0.0.1" | "[::1]") {
        return None;
    }
    Some(url.origin().ascii_serialization())
}

/// API base for every backend call: override, then same-origin `/api/`,
/// then the local development backend.
pub fn resolve_api_base(env: &RuntimeEnv) -> String {
    if let Some(base) = &env.api_override {
        return with_trailing_slash(base);
    }
    if let Some(origin) = remote_origin(env.origin.as_deref()) {
        return format!("{}{}", origin, API_SUFFIX);
    }
    LOCAL_API_BASE.to_string()
}

/// Asset host used to absolutise server-relative media paths. Same priority
/// as [`resolve_api_base`], minus the `/api/` suffix.
pub fn resolve_media_origin(env: &RuntimeEnv) -> String {
    if let Some(base) = &env.api_override {
        let base = with_trailing_slash(base);
        return match base.strip_suffix(API_SUFFIX) {
            Some(stripped) => format!("{}/", stripped),
            None => base,
        };
    }
    if let Some(origin) = remote_origin(env.origin.as_deref()) {
        return format!("{}/", origin);
    }
    LOCAL_MEDIA_ORIGIN.to_string()
}

/// Resolved backend locations. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api_base: String,
    media_origin: String,
}

impl Endpoints {
    pub fn resolve(env: &RuntimeEnv) -> Self {
        let endpoints = Self {
            api_base: resolve_api_base(env),
            media_origin: resolve_media_origin(env),
        };
        tracing::debug!(
            "Resolved API base {} (media origin {})",
            endpoints.api_base,
            endpoints.media_origin
        );
        endpoints
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn media_origin(&self) -> &str {
        &self.media_origin
    }

    /// Absolute URL of an API path such as `videos/by_genre/`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path.trim_start_matches('/'))
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::resolve(&RuntimeEnv::default())
    }
}
