//! OAuth2 authorization-code client
//!
//! Two operations, both driven by a read-only [`ClientConfig`]:
//! 1. Build the authorize URL (`OAuth2Client::authorize_url`), or have a
//!    [`Responder`] redirect the browser to it (`OAuth2Client::authorize`)
//! 2. Exchange the code from the callback for the token endpoint's raw
//!    response (`OAuth2Client::exchange_code`), body bytes untouched
//!
//! The crate keeps no tokens and no pending-flow state. Failures are returned
//! as [`Error`] values; nothing is printed and the process is never halted.

pub mod authorize;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod params;
pub mod token;

pub use authorize::{Authorization, Responder};
pub use client::OAuth2Client;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, Result};
pub use params::Params;
pub use token::TokenResponse;
