//! The OAuth2 client handle
//!
//! Pairs a read-only [`ClientConfig`] with the HTTP client used for the token
//! exchange. The handle holds no per-call state, so independent calls (and
//! clones) never interfere with each other.

use std::time::Duration;

use tracing::debug;

use crate::config::{ClientConfig, non_blank_scopes};
use crate::constants::{CONNECT_TIMEOUT, MAX_REDIRECTS, REQUEST_TIMEOUT};
use crate::error::{Error, Result};

/// OAuth2 authorization-code client.
#[derive(Debug, Clone)]
pub struct OAuth2Client {
    pub(crate) config: ClientConfig,
    pub(crate) http: reqwest::Client,
}

impl OAuth2Client {
    /// Create a client with the fixed token-request transport: up to 3
    /// redirects, verified TLS, 30s connect and 30s total timeouts.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_timeouts(config, CONNECT_TIMEOUT, REQUEST_TIMEOUT)
    }

    pub(crate) fn with_timeouts(
        config: ClientConfig,
        connect_timeout: Duration,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("building HTTP client: {e}")))?;

        debug!(
            client_id = config.client_id(),
            authorize_endpoint = config.authorize_endpoint(),
            access_endpoint = config.access_endpoint(),
            "oauth client ready"
        );

        Ok(Self { config, http })
    }

    /// Replace the scopes requested by subsequent authorize calls.
    ///
    /// Consumes and returns the client so it can be chained after `new`.
    /// Blank entries are dropped, and an empty result removes the `scope`
    /// parameter entirely.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.set_scopes(non_blank_scopes(scopes));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::builder(
            "abc123",
            "https://auth.example.com/authorize",
            "https://auth.example.com/token",
        )
        .scopes(["profile"])
        .build()
        .unwrap()
    }

    #[test]
    fn with_scopes_replaces_configured_scopes() {
        let client = OAuth2Client::new(config())
            .unwrap()
            .with_scopes(["read", "write"]);
        assert_eq!(client.config().scopes(), ["read", "write"]);
    }

    #[test]
    fn with_scopes_leaves_clones_untouched() {
        let original = OAuth2Client::new(config()).unwrap();
        let scoped = original.clone().with_scopes(vec![String::from("admin")]);
        assert_eq!(original.config().scopes(), ["profile"]);
        assert_eq!(scoped.config().scopes(), ["admin"]);
    }
}
