//! OAuth2 protocol and transport constants
//!
//! Transport settings for the token exchange are fixed; callers cannot tune
//! them.

use std::time::Duration;

/// `response_type` sent on every authorize request
pub const RESPONSE_TYPE_CODE: &str = "code";

/// `grant_type` sent on every token request
pub const GRANT_TYPE_AUTHORIZATION_CODE: &str = "authorization_code";

/// Maximum redirect hops followed by the token request
pub const MAX_REDIRECTS: usize = 3;

/// TCP/TLS connect budget for the token request
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Total budget for the token request, body included
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
