//! Presigned upload URL service
//!
//! Issues time-bounded upload authorizations against an S3-compatible object
//! store. Signing is delegated to the provider's presigning primitive; this
//! crate owns request validation, naming policy, expiry accounting and the
//! best-effort lifecycle flow used for verification.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Authorization issuance and the in-memory registry
pub mod issuer;

/// Batch create → issue → upload → delete verification flow
pub mod lifecycle;

/// Bucket/key name generation and validation
pub mod naming;

/// HTTP routes
pub mod routes;

/// Server assembly and startup
pub mod server;

/// Signing gateway over the provider's presigning primitive
pub mod signing;

/// Application state
pub mod state;

/// Environment configuration, error envelope and extractors
pub mod types;
