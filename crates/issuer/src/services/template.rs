//! Certificate HTML rendering.
//!
//! The layout lives in `templates/certificate.html` and is compiled in by
//! askama. The medal image is read from disk on every render and inlined as
//! a base64 data URI, so replacing `selo.png` takes effect without a rebuild.

use std::path::{Path, PathBuf};

use askama::Template;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::instrument;

use ignite_certificates_core::CertificateRequest;

/// Date format printed on certificates (`DD/MM/YYYY`).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Errors that can occur while producing certificate HTML.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The medal image could not be read.
    #[error("failed to read asset {path}: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template engine failed.
    #[error("template render error: {0}")]
    Render(#[from] askama::Error),
}

/// Values merged into the certificate template.
#[derive(Debug, Clone, Template)]
#[template(path = "certificate.html")]
pub struct TemplateContext {
    pub id: String,
    pub name: String,
    pub grade: String,
    /// Issue date, already formatted as `DD/MM/YYYY`.
    pub date: String,
    /// Base64-encoded PNG.
    pub medal: String,
}

impl TemplateContext {
    /// Build the context for `request` issued on `date`.
    #[must_use]
    pub fn new(request: &CertificateRequest, date: NaiveDate, medal: String) -> Self {
        Self {
            id: request.id.to_string(),
            name: request.name.clone(),
            grade: request.grade.clone(),
            date: date.format(DATE_FORMAT).to_string(),
            medal,
        }
    }
}

/// Renders certificate HTML from the compiled template and the medal asset.
#[derive(Debug, Clone)]
pub struct CertificateTemplates {
    medal_path: PathBuf,
}

impl CertificateTemplates {
    /// Create a renderer reading the medal from `medal_path`.
    #[must_use]
    pub fn new(medal_path: impl Into<PathBuf>) -> Self {
        Self {
            medal_path: medal_path.into(),
        }
    }

    /// Path of the medal image.
    #[must_use]
    pub fn medal_path(&self) -> &Path {
        &self.medal_path
    }

    /// Read the medal image and encode it as base64.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::Asset` if the file cannot be read.
    pub async fn load_medal(&self) -> Result<String, TemplateError> {
        let bytes = tokio::fs::read(&self.medal_path)
            .await
            .map_err(|source| TemplateError::Asset {
                path: self.medal_path.clone(),
                source,
            })?;

        Ok(STANDARD.encode(bytes))
    }

    /// Render the certificate HTML for `request` issued on `date`.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` if the medal cannot be loaded or the template
    /// fails to render.
    #[instrument(skip(self, request), fields(certificate_id = %request.id))]
    pub async fn render(
        &self,
        request: &CertificateRequest,
        date: NaiveDate,
    ) -> Result<String, TemplateError> {
        let medal = self.load_medal().await?;
        let html = TemplateContext::new(request, date, medal).render()?;

        tracing::debug!(bytes = html.len(), "Certificate HTML rendered");
        Ok(html)
    }
}
