//! Application state shared across handlers.

use std::sync::Arc;

use crate::services::CertificateIssuer;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; the issuer owns every external collaborator.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    issuer: CertificateIssuer,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(issuer: CertificateIssuer) -> Self {
        Self {
            inner: Arc::new(AppStateInner { issuer }),
        }
    }

    /// Get a reference to the certificate issuer.
    #[must_use]
    pub fn issuer(&self) -> &CertificateIssuer {
        &self.inner.issuer
    }
}
