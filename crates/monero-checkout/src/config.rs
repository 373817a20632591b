use std::env;

use url::Url;

use crate::constants::{ENV_API_KEY, ENV_GATEWAY_URL};

/// Connection settings for one gateway client. Fixed for the client's lifetime.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Absolute base URL of the payment gateway.
    pub gateway_url: Url,
    /// API key sent as `X-Auth-Token` (None = unauthenticated gateway)
    pub credential: Option<String>,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("gateway_url", &self.gateway_url.as_str())
            .field("credential", &self.credential.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl GatewayConfig {
    /// Build a config from a base URL string. The URL must be absolute.
    pub fn new(gateway_url: &str) -> Result<Self, ConfigError> {
        let gateway_url = parse_base_url(gateway_url)?;
        Ok(Self {
            gateway_url,
            credential: None,
        })
    }

    /// Attach an API key. Empty keys are treated as no key.
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        let credential = credential.into();
        self.credential = if credential.is_empty() {
            None
        } else {
            Some(credential)
        };
        self
    }

    /// Load from `MONERO_GATEWAY_URL` and the optional `MONERO_GATEWAY_API_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gateway_url =
            env::var(ENV_GATEWAY_URL).map_err(|_| ConfigError::MissingRequired(ENV_GATEWAY_URL))?;

        let credential = env::var(ENV_API_KEY).ok().filter(|s| !s.is_empty());

        let mut config = Self::new(&gateway_url)?;
        if credential.is_none() {
            tracing::warn!("{ENV_API_KEY} not set, gateway requests will be unauthenticated");
        }
        config.credential = credential;
        Ok(config)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|_| ConfigError::InvalidUrl(raw.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingRequired(&'static str),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
