//! Record store access for issued certificates.
//!
//! # Database: `ignite_certificates`
//!
//! ## Tables
//!
//! - `users_certificates` - One row per certificate holder id, written once
//!
//! # Migrations
//!
//! Migrations are stored in `crates/issuer/migrations/` and run via:
//! ```bash
//! cargo run -p ignite-certificates-cli -- migrate
//! ```

pub mod certificates;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use ignite_certificates_core::{CertificateId, UserCertificateRecord};

pub use certificates::CertificateRepository;

/// Embedded issuer migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur in record store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Store of registered certificate holders.
///
/// Records are write-once: the store never updates an existing id.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records stored under `id` (zero or one in practice).
    async fn query(&self, id: &CertificateId)
    -> Result<Vec<UserCertificateRecord>, RepositoryError>;

    /// Insert `record` unless its id is already present.
    ///
    /// Returns `true` when this call created the record. Concurrent callers
    /// racing on the same id see exactly one `true`.
    async fn put_if_absent(&self, record: &UserCertificateRecord) -> Result<bool, RepositoryError>;

    /// Cheap connectivity check used by the readiness probe.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
