//! Client configuration
//!
//! A `ClientConfig` is assembled once from credentials and endpoints supplied
//! by the embedding application and is read-only afterwards. Validation
//! happens in `ClientConfigBuilder::build`, so a malformed endpoint is
//! rejected at startup instead of surfacing as a failed network call.

use common::Secret;

use crate::error::{Error, Result};

/// Validated OAuth2 client settings.
///
/// Optional values that were supplied empty are stored as absent, so the
/// corresponding request parameters are omitted rather than sent blank.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    client_id: String,
    client_secret: Option<Secret<String>>,
    authorize_endpoint: String,
    access_endpoint: String,
    redirect_uri: Option<String>,
    scopes: Vec<String>,
}

impl ClientConfig {
    /// Start a builder with the three required settings.
    pub fn builder(
        client_id: impl Into<String>,
        authorize_endpoint: impl Into<String>,
        access_endpoint: impl Into<String>,
    ) -> ClientConfigBuilder {
        ClientConfigBuilder {
            client_id: client_id.into(),
            client_secret: None,
            authorize_endpoint: authorize_endpoint.into(),
            access_endpoint: access_endpoint.into(),
            redirect_uri: None,
            scopes: Vec::new(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> Option<&Secret<String>> {
        self.client_secret.as_ref()
    }

    pub fn authorize_endpoint(&self) -> &str {
        &self.authorize_endpoint
    }

    pub fn access_endpoint(&self) -> &str {
        &self.access_endpoint
    }

    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub(crate) fn set_scopes(&mut self, scopes: Vec<String>) {
        self.scopes = scopes;
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    client_id: String,
    client_secret: Option<Secret<String>>,
    authorize_endpoint: String,
    access_endpoint: String,
    redirect_uri: Option<String>,
    scopes: Vec<String>,
}

impl ClientConfigBuilder {
    /// Confidential clients send this with the token request.
    pub fn client_secret(mut self, secret: impl Into<Secret<String>>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Must match the value registered with the authorization server.
    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Blank entries are dropped; an empty result omits `scope` entirely.
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = non_blank_scopes(scopes);
        self
    }

    /// Validate and freeze the configuration.
    pub fn build(self) -> Result<ClientConfig> {
        let client_id = self.client_id.trim().to_owned();
        if client_id.is_empty() {
            return Err(Error::Configuration("client_id must not be empty".into()));
        }

        let authorize_endpoint = validate_url("authorize_endpoint", &self.authorize_endpoint)?;
        if authorize_endpoint.contains('?') {
            return Err(Error::Configuration(format!(
                "authorize_endpoint must not carry a query string, got: {authorize_endpoint}"
            )));
        }
        let access_endpoint = validate_url("access_endpoint", &self.access_endpoint)?;

        let redirect_uri = match self.redirect_uri.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(uri) => Some(validate_url("redirect_uri", uri)?),
        };

        let client_secret = self.client_secret.filter(|s| !s.is_blank());

        Ok(ClientConfig {
            client_id,
            client_secret,
            authorize_endpoint,
            access_endpoint,
            redirect_uri,
            scopes: self.scopes,
        })
    }
}

pub(crate) fn non_blank_scopes<I, S>(scopes: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    scopes
        .into_iter()
        .map(Into::into)
        .filter(|scope: &String| !scope.trim().is_empty())
        .collect()
}

/// Require a non-empty http(s) URL.
fn validate_url(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::Configuration(format!("{field} must not be empty")));
    }
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(Error::Configuration(format!(
            "{field} must start with http:// or https://, got: {value}"
        )));
    }
    Ok(value.to_owned())
}
