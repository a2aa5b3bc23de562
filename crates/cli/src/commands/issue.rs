//! One-off certificate issuing.
//!
//! Runs the same pipeline as `POST /certificates` against the configured
//! record store, browser and bucket, then prints the public URL.

use thiserror::Error;

use ignite_certificates_core::{CertificateRequest, RequestError};
use ignite_certificates_issuer::config::{ConfigError, IssuerConfig};
use ignite_certificates_issuer::db::create_pool;
use ignite_certificates_issuer::services::{CertificateIssuer, IssueError};

/// Errors that can occur while issuing from the command line.
#[derive(Debug, Error)]
pub enum IssueCommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid request: {0}")]
    Request(#[from] RequestError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Issue failed: {0}")]
    Issue(#[from] IssueError),
}

/// Issue a certificate for `id` and print where it was published.
///
/// # Errors
///
/// Returns `IssueCommandError` if configuration, validation or any pipeline
/// step fails.
pub async fn run(id: String, name: String, grade: String) -> Result<(), IssueCommandError> {
    let request = CertificateRequest::new(id, name, grade)?;
    let config = IssuerConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let issuer = CertificateIssuer::from_config(&config, pool).await;

    tracing::info!(certificate_id = %request.id, "Issuing certificate...");
    let issued = issuer.issue(&request).await?;

    if issued.registered {
        tracing::info!("Registered new certificate holder");
    }

    #[allow(clippy::print_stdout)]
    {
        println!("{}", issued.url);
    }

    Ok(())
}
