use std::{sync::Arc, time::Duration};

use reqwest::{Client, Error, cookie::Jar};

use crate::configs::HttpConfig;

const DEFAULT_USER_AGENT: &str = concat!("videoflix-client/", env!("CARGO_PKG_VERSION"));

pub struct HttpClient;

impl HttpClient {
    pub fn default_user_agent() -> String {
        DEFAULT_USER_AGENT.to_string()
    }

    /// Client without a cookie store.
    pub fn new(config: &HttpConfig) -> Result<Client, Error> {
        Self::builder(config).build()
    }

    /// Client that stores and replays cookies from `jar`, which is how the
    /// refresh token travels.
    pub fn with_cookies(config: &HttpConfig, jar: Arc<Jar>) -> Result<Client, Error> {
        Self::builder(config).cookie_provider(jar).build()
    }

    fn builder(config: &HttpConfig) -> reqwest::ClientBuilder {
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(Self::default_user_agent);
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
    }
}
