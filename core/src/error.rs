//! Error types for the PetFriends client.
//!
//! # Design
//! HTTP statuses are never errors here: a 403 or 500 from the service is
//! returned to the caller inside `ApiResponse`. `ApiError` covers only what
//! goes wrong locally (unreadable photo, transport failure) and typed decoding
//! of a response body.

use std::path::PathBuf;

/// Errors returned by the client and by `ApiResponse` decoders.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connection refused, TLS).
    #[error("transport error: {0}")]
    Transport(#[from] ureq::Error),

    /// The photo file could not be read.
    #[error("cannot read photo {}: {source}", path.display())]
    Photo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// A typed decoder was used on a non-JSON body.
    #[error("HTTP {status}: expected JSON body, got: {body}")]
    UnexpectedBody { status: u16, body: String },
}

/// Errors raised while resolving `Settings`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingVar(&'static str),
}
