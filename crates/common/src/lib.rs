//! Shared types for the OAuth client workspace

mod secret;
mod error;

pub use secret::Secret;
pub use error::{Error, Result};
