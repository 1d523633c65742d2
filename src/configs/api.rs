use serde::{Deserialize, Serialize};

/// Where the backend lives.
///
/// Both fields are optional; the endpoint resolver falls back to the local
/// development backend when nothing is configured.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ApiConfig {
    /// Explicit API base, e.g. `https://videoflix.example/api/`.
    pub base_url: Option<String>,
    /// Origin the client is served from, e.g. `https://videoflix.example`.
    pub origin: Option<String>,
}
