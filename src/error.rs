//! Error types
//!
//! Only `GateError` ever reaches the user, and it is recovered on the spot.

use thiserror::Error;

/// Password gate failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// Normalized input did not match the configured secret
    #[error("password does not match")]
    Mismatch,
}

/// Invalid greeting configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("secret must not be empty")]
    EmptySecret,
    #[error("error message must not be empty")]
    EmptyErrorMessage,
    #[error("at least one wish is required")]
    NoWishes,
    #[error("at least one track is required")]
    NoTracks,
}

/// Browser host wiring failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("no window or document available")]
    NoDocument,
    #[error("missing element: {0}")]
    MissingElement(String),
    #[error("element {0} has an unexpected type")]
    WrongElementType(String),
    #[error("2d canvas context unavailable")]
    NoContext,
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("javascript error: {0}")]
    Js(String),
}
