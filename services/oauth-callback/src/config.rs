//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! The client secret is loaded from OAUTH_CLIENT_SECRET or client_secret_file,
//! never stored in the TOML directly to avoid leaking secrets.

use common::Secret;
use oauth_client::{ClientConfig, OAuth2Client};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Env var holding the OAuth client secret
const CLIENT_SECRET_ENV: &str = "OAUTH_CLIENT_SECRET";

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub oauth: OAuthConfig,
}

/// HTTP listener settings
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

/// OAuth client registration
#[derive(Debug, Deserialize)]
pub struct OAuthConfig {
    pub client_id: String,
    pub authorize_endpoint: String,
    pub access_endpoint: String,
    #[serde(default)]
    pub redirect_uri: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(skip)]
    pub client_secret: Option<Secret<String>>,
    /// Path to a file containing the client secret (alternative to OAUTH_CLIENT_SECRET)
    #[serde(default)]
    pub client_secret_file: Option<PathBuf>,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    ///
    /// Client secret resolution order:
    /// 1. OAUTH_CLIENT_SECRET env var
    /// 2. client_secret_file path from config
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if let Ok(secret) = std::env::var(CLIENT_SECRET_ENV) {
            config.oauth.client_secret = Some(Secret::new(secret));
        } else if let Some(ref secret_file) = config.oauth.client_secret_file {
            let secret = std::fs::read_to_string(secret_file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read client_secret_file {}: {e}",
                    secret_file.display()
                ))
            })?;
            let secret = secret.trim().to_owned();
            if !secret.is_empty() {
                config.oauth.client_secret = Some(Secret::new(secret));
            }
        }

        // Surface endpoint mistakes now rather than on the first login
        config.oauth.client_config()?;

        Ok(config)
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("oauth-callback.toml")
    }
}

impl OAuthConfig {
    /// Validated library configuration for this registration.
    pub fn client_config(&self) -> common::Result<ClientConfig> {
        let mut builder = ClientConfig::builder(
            self.client_id.as_str(),
            self.authorize_endpoint.as_str(),
            self.access_endpoint.as_str(),
        )
        .scopes(self.scopes.iter().cloned());
        if let Some(ref redirect_uri) = self.redirect_uri {
            builder = builder.redirect_uri(redirect_uri.as_str());
        }
        if let Some(ref secret) = self.client_secret {
            builder = builder.client_secret(secret.clone());
        }
        builder
            .build()
            .map_err(|e| common::Error::Config(e.to_string()))
    }

    /// Build the OAuth client used by the request handlers.
    pub fn build_client(&self) -> common::Result<OAuth2Client> {
        OAuth2Client::new(self.client_config()?).map_err(|e| common::Error::Config(e.to_string()))
    }
}
