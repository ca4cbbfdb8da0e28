//! Client configuration.
//!
//! [`ClientConfig`] carries the construction-time settings of a
//! [`NebiusClient`](crate::NebiusClient): credential, endpoint, initial
//! model and transport timeout. Environment lookup happens only in
//! [`ClientConfig::from_env`]; nothing deeper in the crate reads the
//! environment.

use std::time::Duration;

/// Default base endpoint for Nebius AI Studio.
pub const DEFAULT_BASE_URL: &str = "https://api.studio.nebius.ai/v1";

/// Environment variable consulted by [`ClientConfig::from_env`] for the
/// base endpoint.
pub const BASE_URL_ENV: &str = "NEBIUS_BASE_URL";

/// Default transport timeout. Large completions can run for minutes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(360);

/// Construction-time settings for a [`NebiusClient`](crate::NebiusClient).
#[derive(Clone)]
pub struct ClientConfig {
    /// API key sent as a bearer token.
    pub api_key: String,

    /// Base endpoint URL (e.g. `https://api.studio.nebius.ai/v1`).
    pub base_url: String,

    /// Initial model identifier. The client falls back to the default
    /// model when this is absent or not in the supported set.
    pub model: Option<String>,

    /// Transport-level request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Configuration with the stock endpoint and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            model: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Like [`ClientConfig::new`], but consults the `NEBIUS_BASE_URL`
    /// environment variable for the endpoint before falling back to the
    /// default. Intended for bootstrap code; the rest of the crate never
    /// reads the environment.
    pub fn from_env(api_key: impl Into<String>) -> Self {
        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var(BASE_URL_ENV)
            && !url.is_empty()
        {
            config.base_url = url;
        }
        config
    }

    /// Override the base endpoint URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the initial model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Override the transport timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}
