//! HTTP route handlers for the issuer.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (record store reachable)
//!
//! # Certificates
//! POST /certificates           - Issue (or re-issue) a certificate
//! ```
//!
//! Health routes are mounted by the binary; everything here needs `AppState`.

pub mod certificates;

use axum::{Router, routing::post};

use crate::state::AppState;

/// Create all routes for the issuer.
pub fn routes() -> Router<AppState> {
    Router::new().route("/certificates", post(certificates::create))
}
