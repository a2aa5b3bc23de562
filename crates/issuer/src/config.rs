//! Issuer configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ISSUER_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `ISSUER_HOST` - Bind address (default: 127.0.0.1)
//! - `ISSUER_PORT` - Listen port (default: 3000)
//! - `CERTIFICATE_BUCKET` - Bucket receiving the PDFs (default: serverlessignitecertificate)
//! - `AWS_REGION` - Bucket region (default: sa-east-1)
//! - `S3_ENDPOINT` - Upload endpoint override (e.g. a local `MinIO`)
//! - `CERTIFICATE_ASSETS_DIR` - Directory holding `selo.png` (default: crates/issuer/assets)
//! - `CHROME_PATH` - Browser executable (default: auto-detected)
//! - `IS_OFFLINE` - When truthy, also write each PDF to `OFFLINE_PDF_PATH`
//! - `OFFLINE_PDF_PATH` - Debug output path (default: certificate.pdf)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//!
//! Object store credentials are not read here. The AWS SDK resolves them
//! through its default provider chain (environment, shared profile, web
//! identity, container or instance role).

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_BUCKET: &str = "serverlessignitecertificate";
const DEFAULT_REGION: &str = "sa-east-1";
const DEFAULT_ASSETS_DIR: &str = "crates/issuer/assets";
const DEFAULT_OFFLINE_PDF_PATH: &str = "certificate.pdf";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Issuer application configuration.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Object store configuration
    pub storage: StorageConfig,
    /// Template asset configuration
    pub assets: AssetsConfig,
    /// Browser executable override
    pub chrome_path: Option<PathBuf>,
    /// Local copy of every rendered PDF, set only in offline mode
    pub offline_pdf_path: Option<PathBuf>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// S3-compatible object store configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Bucket that receives the certificates
    pub bucket: String,
    /// Bucket region (e.g., sa-east-1)
    pub region: String,
    /// Endpoint override (`MinIO`, `LocalStack`); AWS endpoint resolution when `None`
    pub endpoint: Option<Url>,
}

/// Location of the static certificate assets.
#[derive(Debug, Clone)]
pub struct AssetsConfig {
    /// Directory containing `selo.png`
    pub dir: PathBuf,
}

impl AssetsConfig {
    /// File name of the medal image embedded in every certificate.
    pub const MEDAL_FILE: &'static str = "selo.png";

    /// Full path of the medal image.
    #[must_use]
    pub fn medal_path(&self) -> PathBuf {
        self.dir.join(Self::MEDAL_FILE)
    }
}

impl IssuerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(&|key: &str| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`IssuerConfig::from_env`].
    pub fn from_source(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = get_database_url(env, "ISSUER_DATABASE_URL")?;
        let host = get_env_or_default(env, "ISSUER_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ISSUER_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default(env, "ISSUER_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ISSUER_PORT".to_string(), e.to_string()))?;

        let storage = StorageConfig::from_source(env)?;
        let assets = AssetsConfig {
            dir: PathBuf::from(get_env_or_default(
                env,
                "CERTIFICATE_ASSETS_DIR",
                DEFAULT_ASSETS_DIR,
            )),
        };
        let chrome_path = env("CHROME_PATH").map(PathBuf::from);
        let offline_pdf_path = is_truthy(env("IS_OFFLINE").as_deref()).then(|| {
            PathBuf::from(get_env_or_default(
                env,
                "OFFLINE_PDF_PATH",
                DEFAULT_OFFLINE_PDF_PATH,
            ))
        });

        Ok(Self {
            database_url,
            host,
            port,
            storage,
            assets,
            chrome_path,
            offline_pdf_path,
            sentry_dsn: env("SENTRY_DSN"),
            sentry_environment: env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StorageConfig {
    fn from_source(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let endpoint = env("S3_ENDPOINT")
            .map(|raw| {
                Url::parse(&raw)
                    .map_err(|e| ConfigError::InvalidEnvVar("S3_ENDPOINT".to_string(), e.to_string()))
            })
            .transpose()?;

        Ok(Self {
            bucket: get_env_or_default(env, "CERTIFICATE_BUCKET", DEFAULT_BUCKET),
            region: get_env_or_default(env, "AWS_REGION", DEFAULT_REGION),
            endpoint,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(
    env: &dyn Fn(&str) -> Option<String>,
    primary_key: &str,
) -> Result<SecretString, ConfigError> {
    env(primary_key)
        .or_else(|| env("DATABASE_URL"))
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(env: &dyn Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    env(key).unwrap_or_else(|| default.to_string())
}

/// Interpret a flag-style variable. Unset, empty, `0` and `false` are off.
fn is_truthy(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim();
        !(v.is_empty() || v == "0" || v.eq_ignore_ascii_case("false"))
    })
}
