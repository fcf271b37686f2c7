//! Central error types for the exporter
//!
//! Uses `thiserror` for ergonomic, type-safe error handling with
//! automatic `Display` and `Error` trait implementations.

use thiserror::Error;

/// Central error type for the exporter
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure talking to the nomad api (from reqwest)
    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The nomad api answered with a non-success status
    #[error("{endpoint} returned HTTP {status}")]
    ApiStatus {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    /// Payload did not match the expected JSON shape
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Configuration validation error
    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for exporter operations
pub type Result<T, E = Error> = std::result::Result<T, E>;
