use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, cookie::Jar};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::common::{AccessToken, ApiError, HttpClient};
use crate::configs::HttpConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// An outgoing backend call, before and after authorization.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
    /// Bearer credential, attached by the authorization layer.
    pub bearer: Option<AccessToken>,
    /// Send and accept cookies (the refresh token lives in one).
    pub with_credentials: bool,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
            bearer: None,
            with_credentials: false,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            body: Some(body),
            bearer: None,
            with_credentials: false,
        }
    }

    pub fn with_credentials(mut self) -> Self {
        self.with_credentials = true;
        self
    }

    pub fn with_bearer(mut self, token: Option<AccessToken>) -> Self {
        self.bearer = token;
        self
    }
}

/// Raw response of any status.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Converts a non-2xx response into its typed error.
    pub fn into_result(self) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::from_status(self.status, &self.body))
        }
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Moves requests over the wire.
///
/// Implementations return every HTTP status as `Ok`; only failures to get a
/// response at all are errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// `reqwest`-backed transport sharing one cookie jar across credentialed
/// requests.
pub struct ReqwestTransport {
    plain: Client,
    credentialed: Client,
    jar: Arc<Jar>,
}

impl ReqwestTransport {
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let jar = Arc::new(Jar::default());
        Ok(Self {
            plain: HttpClient::new(config)?,
            credentialed: HttpClient::with_cookies(config, jar.clone())?,
            jar,
        })
    }

    pub fn cookie_jar(&self) -> Arc<Jar> {
        self.jar.clone()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let client = if request.with_credentials {
            &self.credentialed
        } else {
            &self.plain
        };

        let mut builder = match request.method {
            Method::Get => client.get(&request.url),
            Method::Post => client.post(&request.url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(&**token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::trace!("{:?} {}", request.method, request.url);
        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?;
        Ok(ApiResponse::new(status, body.to_vec()))
    }
}
