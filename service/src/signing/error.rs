//! Error types for signing operations

use thiserror::Error;

/// Result type for signing operations
pub type SigningResult<T> = Result<T, SigningError>;

/// Errors that can occur while producing a signed URL
#[derive(Debug, Error)]
pub enum SigningError {
    /// Requested TTL is outside the provider-accepted range
    #[error("ttl out of range: {0} (must be between 1 and 604800 seconds)")]
    InvalidTtl(i64),

    /// Presigning configuration could not be built
    #[error("presigning configuration error: {0}")]
    Config(String),

    /// Provider-side failure (credentials, network, service error)
    #[error("provider signing failure: {0}")]
    Provider(String),
}
