//! Application state management

use std::sync::Arc;

use crate::issuer::Issuer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Authorization issuer
    pub issuer: Arc<Issuer>,
}
