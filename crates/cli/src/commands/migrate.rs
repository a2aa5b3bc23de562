//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! ignite-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `ISSUER_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Issuer migrations live in `crates/issuer/migrations/` and are embedded
//! into the binary at build time.

use secrecy::SecretString;
use thiserror::Error;

use ignite_certificates_issuer::db::{MIGRATOR, create_pool};

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run issuer database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ISSUER_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MigrationError::MissingEnvVar("ISSUER_DATABASE_URL"))?;

    tracing::info!("Connecting to issuer database...");
    let pool = create_pool(&SecretString::from(database_url)).await?;

    tracing::info!("Running issuer migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Issuer migrations complete!");
    Ok(())
}
