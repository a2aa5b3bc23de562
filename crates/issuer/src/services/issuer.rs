//! Certificate issuing pipeline.
//!
//! One call to [`CertificateIssuer::issue`] runs, in order:
//!
//! 1. Registration: look the id up and insert a record if none exists
//! 2. HTML rendering with today's date and the medal image
//! 3. PDF conversion in a freshly launched browser
//! 4. Upload to `{id}.pdf`, replacing any previous certificate
//!
//! Steps never overlap and nothing is retried or rolled back. A failure
//! after registration leaves the record in place without a PDF; issuing
//! again for the same id repairs that.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use ignite_certificates_core::{CertificateId, CertificateRequest, UserCertificateRecord};

use super::renderer::{ChromeRenderer, PdfOptions, PdfRenderer, RenderError};
use super::storage::{ObjectStore, PutObject, S3Client, StorageError};
use super::template::{CertificateTemplates, TemplateError};
use crate::config::IssuerConfig;
use crate::db::{CertificateRepository, RecordStore, RepositoryError};

/// Errors that abort an issue.
#[derive(Debug, Error)]
pub enum IssueError {
    /// Record store lookup or insert failed.
    #[error("record store error: {0}")]
    Repository(#[from] RepositoryError),

    /// Template or medal asset failed.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// PDF conversion failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Upload failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Offline debug copy could not be written.
    #[error("failed to write debug PDF {path}: {source}")]
    DebugOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of a successful issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCertificate {
    pub id: CertificateId,
    /// Public URL of the uploaded PDF.
    pub url: String,
    /// Whether this call created the holder's record.
    pub registered: bool,
}

/// Orchestrates registration, rendering and upload of certificates.
pub struct CertificateIssuer {
    records: Arc<dyn RecordStore>,
    templates: CertificateTemplates,
    renderer: Arc<dyn PdfRenderer>,
    objects: Arc<dyn ObjectStore>,
    offline_pdf_path: Option<PathBuf>,
}

impl CertificateIssuer {
    /// Create an issuer from its collaborators.
    #[must_use]
    pub fn new(
        records: Arc<dyn RecordStore>,
        templates: CertificateTemplates,
        renderer: Arc<dyn PdfRenderer>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            records,
            templates,
            renderer,
            objects,
            offline_pdf_path: None,
        }
    }

    /// Also write every rendered PDF to `path` before uploading it.
    #[must_use]
    pub fn with_offline_pdf_path(mut self, path: Option<PathBuf>) -> Self {
        self.offline_pdf_path = path;
        self
    }

    /// Wire the production collaborators described by `config`.
    ///
    /// Object store credentials are resolved by the AWS default provider chain.
    pub async fn from_config(config: &IssuerConfig, pool: PgPool) -> Self {
        let records = Arc::new(CertificateRepository::new(pool));
        let templates = CertificateTemplates::new(config.assets.medal_path());
        let renderer = Arc::new(ChromeRenderer::new(config.chrome_path.clone()));
        let objects = Arc::new(S3Client::from_env(&config.storage).await);

        Self::new(records, templates, renderer, objects)
            .with_offline_pdf_path(config.offline_pdf_path.clone())
    }

    /// The record store this issuer registers holders in.
    #[must_use]
    pub fn records(&self) -> &dyn RecordStore {
        self.records.as_ref()
    }

    /// Issue (or re-issue) the certificate for `request`, dated today.
    ///
    /// # Errors
    ///
    /// Returns `IssueError` from the first collaborator that fails; earlier
    /// side effects are kept.
    pub async fn issue(&self, request: &CertificateRequest) -> Result<IssuedCertificate, IssueError> {
        self.issue_on(request, Local::now().date_naive()).await
    }

    #[instrument(skip(self, request), fields(certificate_id = %request.id))]
    async fn issue_on(
        &self,
        request: &CertificateRequest,
        date: NaiveDate,
    ) -> Result<IssuedCertificate, IssueError> {
        let registered = self.register(request).await?;

        let html = self.templates.render(request, date).await?;
        let pdf = self
            .renderer
            .render(&html, &PdfOptions::certificate())
            .await?;

        if let Some(path) = &self.offline_pdf_path {
            tokio::fs::write(path, &pdf)
                .await
                .map_err(|source| IssueError::DebugOutput {
                    path: path.clone(),
                    source,
                })?;
            tracing::info!(path = %path.display(), "Debug PDF written");
        }

        let key = request.id.object_key();
        self.objects
            .put_object(PutObject::public_pdf(key.clone(), pdf))
            .await?;

        let url = self.objects.public_url(&key);
        tracing::info!(%url, registered, "Certificate issued");

        Ok(IssuedCertificate {
            id: request.id.clone(),
            url,
            registered,
        })
    }

    /// Register the holder unless a record already exists.
    ///
    /// An existing record is never touched, even if the request carries a
    /// different name or grade.
    async fn register(&self, request: &CertificateRequest) -> Result<bool, RepositoryError> {
        let existing = self.records.query(&request.id).await?;
        if let Some(record) = existing.first() {
            if record.name != request.name || record.grade != request.grade {
                tracing::debug!("Request differs from stored record; keeping stored record");
            }
            return Ok(false);
        }

        let inserted = self
            .records
            .put_if_absent(&UserCertificateRecord::from(request))
            .await?;
        if !inserted {
            tracing::debug!("Record created concurrently by another request");
        }

        Ok(inserted)
    }
}
