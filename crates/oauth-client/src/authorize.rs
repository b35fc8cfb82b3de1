//! Authorize URL construction and redirect emission
//!
//! Building the URL is a pure function of the configuration and the caller's
//! parameters. Issuing the browser redirect is delegated to a [`Responder`]
//! supplied by the serving layer, so this crate never touches a response
//! object of any particular web framework.

use tracing::debug;

use crate::client::OAuth2Client;
use crate::constants::RESPONSE_TYPE_CODE;
use crate::params::Params;

/// Capability to answer the current request with an HTTP redirect.
///
/// Implemented for any `FnOnce(&str) -> T`, so a web handler can pass a
/// closure such as `|url: &str| Redirect::to(url)`.
pub trait Responder {
    /// Whatever the serving layer needs to deliver the redirect.
    type Response;

    /// Produce a redirect (302/303 with `Location: location`).
    fn redirect(self, location: &str) -> Self::Response;
}

impl<F, T> Responder for F
where
    F: FnOnce(&str) -> T,
{
    type Response = T;

    fn redirect(self, location: &str) -> T {
        self(location)
    }
}

/// Outcome of [`OAuth2Client::authorize`]: either the URL itself, or the
/// responder's redirect. Never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization<T> {
    Url(String),
    Redirect(T),
}

impl OAuth2Client {
    /// Build the authorize URL.
    ///
    /// Starts from `response_type=code` and `client_id`, then adds
    /// `redirect_uri` and the comma-joined `scope` when configured, then
    /// merges `optional_params` over the result. Caller values win on a key
    /// collision, including `response_type` and `client_id`.
    pub fn authorize_url(&self, optional_params: &Params) -> String {
        let params = self.authorize_params(optional_params);
        format!(
            "{}?{}",
            self.config.authorize_endpoint(),
            params.to_query()
        )
    }

    /// Build the authorize URL and either return it or hand it to
    /// `responder` as a redirect.
    ///
    /// With `redirect_on_call` false the responder is dropped unused.
    pub fn authorize<R: Responder>(
        &self,
        responder: R,
        redirect_on_call: bool,
        optional_params: &Params,
    ) -> Authorization<R::Response> {
        let url = self.authorize_url(optional_params);
        if redirect_on_call {
            debug!(endpoint = self.config.authorize_endpoint(), "redirecting to authorize endpoint");
            Authorization::Redirect(responder.redirect(&url))
        } else {
            Authorization::Url(url)
        }
    }

    fn authorize_params(&self, optional_params: &Params) -> Params {
        let mut params = Params::new();
        params.set("response_type", RESPONSE_TYPE_CODE);
        params.set("client_id", self.config.client_id());
        if let Some(redirect_uri) = self.config.redirect_uri() {
            params.set("redirect_uri", redirect_uri);
        }
        if !self.config.scopes().is_empty() {
            params.set("scope", self.config.scopes().join(","));
        }
        params.merge(optional_params);
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    const AUTHORIZE: &str = "https://auth.example.com/authorize";

    fn client(configure: impl FnOnce(crate::ClientConfigBuilder) -> crate::ClientConfigBuilder) -> OAuth2Client {
        let builder = ClientConfig::builder("abc123", AUTHORIZE, "https://auth.example.com/token");
        OAuth2Client::new(configure(builder).build().unwrap()).unwrap()
    }

    #[test]
    fn minimal_url_has_defaults_only() {
        let url = client(|b| b).authorize_url(&Params::new());
        assert_eq!(
            url,
            "https://auth.example.com/authorize?response_type=code&client_id=abc123"
        );
        assert!(!url.ends_with('&'));
        assert_eq!(url.matches('?').count(), 1);
    }

    #[test]
    fn redirect_uri_is_encoded_once() {
        let url = client(|b| b.redirect_uri("https://app.example.com/cb")).authorize_url(&Params::new());
        assert_eq!(
            url.matches("redirect_uri=https%3A%2F%2Fapp.example.com%2Fcb").count(),
            1,
            "got: {url}"
        );
        assert_eq!(url.matches("redirect_uri=").count(), 1);
    }

    #[test]
    fn scopes_are_comma_joined_then_encoded() {
        let url = client(|b| b)
            .with_scopes(["read", "write"])
            .authorize_url(&Params::new());
        assert_eq!(url.matches("scope=read%2Cwrite").count(), 1, "got: {url}");
        assert!(url.ends_with("&scope=read%2Cwrite"));
    }

    #[test]
    fn empty_scopes_omit_the_parameter() {
        let url = client(|b| b.scopes(["read"]))
            .with_scopes(Vec::<String>::new())
            .authorize_url(&Params::new());
        assert!(!url.contains("scope="), "got: {url}");
    }

    #[test]
    fn blank_scopes_never_produce_an_empty_scope_param() {
        let url = client(|b| b).with_scopes([""]).authorize_url(&Params::new());
        assert!(!url.contains("scope="), "got: {url}");

        let url = client(|b| b.scopes([" "])).authorize_url(&Params::new());
        assert!(!url.contains("scope="), "got: {url}");

        let url = client(|b| b)
            .with_scopes(["read", " ", "write"])
            .authorize_url(&Params::new());
        assert!(url.ends_with("&scope=read%2Cwrite"), "got: {url}");
    }

    #[test]
    fn optional_params_are_appended_once_each() {
        let optional = Params::from([("state", "xyz 1"), ("prompt", "consent")]);
        let url = client(|b| b.redirect_uri("https://app.example.com/cb")).authorize_url(&optional);
        assert_eq!(
            url,
            "https://auth.example.com/authorize?response_type=code&client_id=abc123\
             &redirect_uri=https%3A%2F%2Fapp.example.com%2Fcb&state=xyz+1&prompt=consent"
        );
        for key in ["response_type=", "client_id=", "redirect_uri=", "state=", "prompt="] {
            assert_eq!(url.matches(key).count(), 1, "{key} in {url}");
        }
    }

    #[test]
    fn caller_values_override_defaults_in_place() {
        let optional = Params::from([("client_id", "other"), ("response_type", "token")]);
        let url = client(|b| b).authorize_url(&optional);
        assert_eq!(
            url,
            "https://auth.example.com/authorize?response_type=token&client_id=other"
        );
    }

    #[test]
    fn repeated_calls_are_byte_identical() {
        let client = client(|b| b.redirect_uri("https://app.example.com/cb").scopes(["a", "b"]));
        let optional = Params::from([("state", "s")]);
        assert_eq!(client.authorize_url(&optional), client.authorize_url(&optional));
    }

    #[test]
    fn authorize_without_redirect_returns_url_and_skips_responder() {
        let client = client(|b| b);
        let outcome = client.authorize(
            |_: &str| -> () { panic!("responder must not run") },
            false,
            &Params::new(),
        );
        assert_eq!(
            outcome,
            Authorization::Url(client.authorize_url(&Params::new()))
        );
    }

    #[test]
    fn authorize_with_redirect_hands_url_to_responder() {
        let client = client(|b| b);
        let outcome = client.authorize(
            |location: &str| (303u16, format!("Location: {location}")),
            true,
            &Params::from([("state", "abc")]),
        );
        match outcome {
            Authorization::Redirect((status, header)) => {
                assert_eq!(status, 303);
                assert_eq!(
                    header,
                    "Location: https://auth.example.com/authorize?response_type=code&client_id=abc123&state=abc"
                );
            }
            Authorization::Url(url) => panic!("expected redirect, got url {url}"),
        }
    }

    struct RecordingResponder<'a>(&'a std::cell::RefCell<Vec<String>>);

    impl Responder for RecordingResponder<'_> {
        type Response = ();

        fn redirect(self, location: &str) {
            self.0.borrow_mut().push(location.to_owned());
        }
    }

    #[test]
    fn custom_responder_is_invoked_once() {
        let seen = std::cell::RefCell::new(Vec::new());
        let client = client(|b| b);
        let outcome = client.authorize(RecordingResponder(&seen), true, &Params::new());
        assert_eq!(outcome, Authorization::Redirect(()));
        assert_eq!(seen.borrow().as_slice(), [client.authorize_url(&Params::new())]);
    }
}
