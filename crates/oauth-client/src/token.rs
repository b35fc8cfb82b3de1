//! Authorization code exchange
//!
//! POSTs the code, the client credentials and any caller overrides to the
//! access endpoint as a form body and returns the endpoint's response body
//! untouched. Parsing the token JSON is left to the caller.

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::client::OAuth2Client;
use crate::constants::GRANT_TYPE_AUTHORIZATION_CODE;
use crate::error::{Error, Result};
use crate::params::Params;

/// Successful token endpoint response, exactly as received.
///
/// The body is never decoded or re-encoded; [`TokenResponse::text`] checks
/// UTF-8 without replacing invalid bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenResponse {
    content_type: Option<String>,
    body: Bytes,
}

impl TokenResponse {
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// `Content-Type` reported by the token endpoint, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn text(&self) -> std::result::Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.body)
    }
}

impl OAuth2Client {
    /// Exchange an authorization code for the token endpoint's raw response.
    ///
    /// Sends exactly one request and never retries. Anything other than
    /// `200 OK` is returned as [`Error::NonSuccessStatus`] with the body
    /// attached; failures before a complete response are
    /// [`Error::Transport`] or [`Error::Timeout`].
    pub async fn exchange_code(
        &self,
        code: &str,
        optional_params: &Params,
    ) -> Result<TokenResponse> {
        let params = self.token_params(code, optional_params);
        debug!(
            endpoint = self.config.access_endpoint(),
            params = params.len(),
            "exchanging authorization code"
        );

        let response = self
            .http
            .post(self.config.access_endpoint())
            .form(params.as_pairs())
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        // Read the whole body before classifying; a body cut short is a
        // transport failure, not a result.
        let body = response.bytes().await?;

        if status != StatusCode::OK {
            debug!(%status, "token endpoint rejected code exchange");
            return Err(Error::NonSuccessStatus {
                status: status.as_u16(),
                body,
            });
        }

        debug!(%status, bytes = body.len(), "token exchange complete");
        Ok(TokenResponse { content_type, body })
    }

    fn token_params(&self, code: &str, optional_params: &Params) -> Params {
        let mut params = Params::new();
        params.set("grant_type", GRANT_TYPE_AUTHORIZATION_CODE);
        params.set("code", code);
        params.set("client_id", self.config.client_id());
        if let Some(secret) = self.config.client_secret() {
            params.set("client_secret", secret.expose().as_str());
        }
        if let Some(redirect_uri) = self.config.redirect_uri() {
            params.set("redirect_uri", redirect_uri);
        }
        params.merge(optional_params);
        params
    }
}
