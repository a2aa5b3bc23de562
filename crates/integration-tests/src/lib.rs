//! Integration tests for Ignite Certificates.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate the database and start the issuer
//! cargo run -p ignite-certificates-cli -- migrate
//! cargo run -p ignite-certificates-issuer
//!
//! # Run the ignored integration tests
//! cargo test -p ignite-certificates-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `certificates` - HTTP tests against a running issuer
//! - `record_store` - `PostgreSQL` record store tests
//!
//! # Environment Variables
//!
//! - `ISSUER_BASE_URL` - Issuer address (default `http://localhost:3000`)
//! - `ISSUER_DATABASE_URL` - Database used by `record_store` tests

use uuid::Uuid;

/// Base URL of the issuer under test.
#[must_use]
pub fn issuer_base_url() -> String {
    std::env::var("ISSUER_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Database URL for record store tests, if configured.
#[must_use]
pub fn database_url() -> Option<String> {
    std::env::var("ISSUER_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
}

/// A certificate id no other test run will use.
#[must_use]
pub fn unique_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}
