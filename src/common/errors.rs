use serde_json::{Map, Value};

/// Error payload returned by the backend.
///
/// Human-readable text lives under one of `error`, `message` or `detail`;
/// registration failures additionally carry per-field arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
    pub detail: Option<String>,
    pub email: Vec<String>,
    pub confirm_password: Vec<String>,
}

impl ErrorBody {
    /// Parses a response body leniently, key by key. A key with an
    /// unexpected shape is skipped; anything but a JSON object yields an
    /// empty body.
    pub fn parse(bytes: &[u8]) -> Self {
        let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(bytes) else {
            return Self::default();
        };
        Self {
            error: text(&map, "error"),
            message: text(&map, "message"),
            detail: text(&map, "detail"),
            email: texts(&map, "email"),
            confirm_password: texts(&map, "confirm_password"),
        }
    }

    /// First of `error`, `message`, `detail` that is present.
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .or(self.detail.as_deref())
    }

    pub fn has_field_errors(&self) -> bool {
        !self.email.is_empty() || !self.confirm_password.is_empty()
    }
}

fn text(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn texts(map: &Map<String, Value>, key: &str) -> Vec<String> {
    match map.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

/// Errors surfaced by every backend operation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unauthorized")]
    Unauthorized(ErrorBody),
    #[error("request failed with status {status}")]
    Status { status: u16, body: ErrorBody },
    #[error("invalid link: {0}")]
    InvalidLink(&'static str),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Maps a non-success response into its typed error.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let body = ErrorBody::parse(body);
        if status == 401 {
            Self::Unauthorized(body)
        } else {
            Self::Status { status, body }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            Self::Unauthorized(body) | Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// A 4xx response carrying per-field validation errors.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Status { status, body } => (400..500).contains(status) && body.has_field_errors(),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
