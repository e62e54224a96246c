//! Bucket and object key naming policy
//!
//! Names combine a caller-supplied prefix with a high-entropy numeric suffix.
//! Uniqueness is best-effort: a collision is surfaced by the provider at
//! bucket creation, not prevented here.

use rand::Rng;
use thiserror::Error;

/// Default prefix for synthesized names
pub const DEFAULT_PREFIX: &str = "test";

/// Minimum legal bucket name length
pub const MIN_NAME_LEN: usize = 3;

/// Maximum legal bucket name length
pub const MAX_NAME_LEN: usize = 63;

// 10^10 suffix space keeps collision probability negligible at demo scale.
const SUFFIX_SPACE: u64 = 10_000_000_000;

/// Errors raised by the naming policy
#[derive(Debug, Error)]
pub enum NamingError {
    /// Name violates the provider's legal-name grammar
    #[error("invalid bucket or key name: {0}")]
    InvalidName(String),
}

/// A synthesized bucket/key pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamingResult {
    /// Bucket name, `{prefix}-bucket-{suffix}`
    pub bucket: String,
    /// Object key, `{prefix}-object-{suffix}`
    pub key: String,
}

/// Generates and validates provider-legal names
pub struct NamingPolicy;

impl NamingPolicy {
    /// Synthesizes a bucket name and object key from `prefix`
    ///
    /// Each suffix is an independent uniform draw from `[0, 10^10)`, so
    /// distinct calls collide only with negligible probability.
    ///
    /// # Errors
    ///
    /// Returns `NamingError::InvalidName` when the prefix produces a name
    /// outside the legal grammar (for example an uppercase or overlong
    /// prefix).
    pub fn generate(prefix: &str) -> Result<NamingResult, NamingError> {
        let mut rng = rand::thread_rng();
        let bucket = format!("{prefix}-bucket-{}", rng.gen_range(0..SUFFIX_SPACE));
        let key = format!("{prefix}-object-{}", rng.gen_range(0..SUFFIX_SPACE));

        Self::ensure_valid(&bucket)?;
        Self::ensure_valid(&key)?;

        Ok(NamingResult { bucket, key })
    }

    /// Checks a name against the provider's legal-name grammar
    ///
    /// Legal names are 3–63 characters, lowercase alphanumeric plus hyphens,
    /// and start and end with an alphanumeric character.
    #[must_use]
    pub fn validate(name: &str) -> bool {
        if name.len() < MIN_NAME_LEN || name.len() > MAX_NAME_LEN {
            return false;
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return false;
        }

        // First/last characters must be alphanumeric
        let first = name.as_bytes()[0];
        let last = name.as_bytes()[name.len() - 1];
        first != b'-' && last != b'-'
    }

    /// Validates a name, failing fast before any network call
    ///
    /// # Errors
    ///
    /// Returns `NamingError::InvalidName` when the name violates the grammar.
    pub fn ensure_valid(name: &str) -> Result<(), NamingError> {
        if Self::validate(name) {
            Ok(())
        } else {
            Err(NamingError::InvalidName(name.to_owned()))
        }
    }
}
