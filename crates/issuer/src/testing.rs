//! In-memory collaborators for unit tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use ignite_certificates_core::{CertificateId, UserCertificateRecord};

use crate::db::{RecordStore, RepositoryError};
use crate::services::CertificateIssuer;
use crate::services::renderer::{PdfOptions, PdfRenderer, RenderError};
use crate::services::storage::{ObjectStore, PutObject, StorageError};
use crate::services::template::CertificateTemplates;

/// The medal image shipped with the crate.
pub fn medal_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/selo.png")
}

/// Issuer wired to the shipped medal and the given fakes.
pub fn issuer_with(
    records: Arc<dyn RecordStore>,
    renderer: Arc<dyn PdfRenderer>,
    objects: Arc<dyn ObjectStore>,
) -> CertificateIssuer {
    CertificateIssuer::new(
        records,
        CertificateTemplates::new(medal_path()),
        renderer,
        objects,
    )
}

#[derive(Default)]
struct RecordState {
    records: BTreeMap<CertificateId, UserCertificateRecord>,
    fail_next: bool,
}

/// Record store backed by a map behind a single lock.
#[derive(Default)]
pub struct MemoryRecordStore {
    state: Mutex<RecordState>,
}

impl MemoryRecordStore {
    pub async fn record_count(&self) -> usize {
        self.state.lock().await.records.len()
    }

    /// Make the next operation fail with a corruption error.
    pub async fn fail_next(&self) {
        self.state.lock().await.fail_next = true;
    }
}

fn take_failure(state: &mut RecordState) -> Result<(), RepositoryError> {
    if std::mem::take(&mut state.fail_next) {
        return Err(RepositoryError::DataCorruption("injected failure".to_string()));
    }
    Ok(())
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn query(
        &self,
        id: &CertificateId,
    ) -> Result<Vec<UserCertificateRecord>, RepositoryError> {
        let mut state = self.state.lock().await;
        take_failure(&mut state)?;
        Ok(state.records.get(id).cloned().into_iter().collect())
    }

    async fn put_if_absent(&self, record: &UserCertificateRecord) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().await;
        take_failure(&mut state)?;
        if state.records.contains_key(&record.id) {
            return Ok(false);
        }
        state.records.insert(record.id.clone(), record.clone());
        Ok(true)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        take_failure(&mut state)
    }
}

#[derive(Clone)]
struct Rendered {
    html: String,
    options: PdfOptions,
    pdf: Vec<u8>,
}

/// Renderer that records its input and returns a fake PDF embedding the HTML.
#[derive(Default)]
pub struct RecordingRenderer {
    last: Mutex<Option<Rendered>>,
}

impl RecordingRenderer {
    pub async fn last_html(&self) -> Option<String> {
        self.last.lock().await.as_ref().map(|r| r.html.clone())
    }

    pub async fn last_options(&self) -> Option<PdfOptions> {
        self.last.lock().await.as_ref().map(|r| r.options)
    }

    pub async fn last_pdf(&self) -> Option<Vec<u8>> {
        self.last.lock().await.as_ref().map(|r| r.pdf.clone())
    }
}

#[async_trait]
impl PdfRenderer for RecordingRenderer {
    async fn render(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, RenderError> {
        let pdf = format!("%PDF-1.4\n{html}").into_bytes();
        *self.last.lock().await = Some(Rendered {
            html: html.to_owned(),
            options: *options,
            pdf: pdf.clone(),
        });
        Ok(pdf)
    }
}

/// Renderer whose browser never starts.
pub struct FailingRenderer;

#[async_trait]
impl PdfRenderer for FailingRenderer {
    async fn render(&self, _html: &str, _options: &PdfOptions) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::Launch("no browser in tests".to_string()))
    }
}

#[derive(Default)]
struct ObjectState {
    objects: BTreeMap<String, PutObject>,
    puts: usize,
}

/// Object store keeping uploads in memory, addressed like the default bucket.
#[derive(Default)]
pub struct MemoryObjectStore {
    state: Mutex<ObjectState>,
}

impl MemoryObjectStore {
    pub async fn keys(&self) -> Vec<String> {
        self.state.lock().await.objects.keys().cloned().collect()
    }

    pub async fn get(&self, key: &str) -> Option<PutObject> {
        self.state.lock().await.objects.get(key).cloned()
    }

    pub async fn put_count(&self) -> usize {
        self.state.lock().await.puts
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(&self, object: PutObject) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        state.puts += 1;
        state.objects.insert(object.key.clone(), object);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://serverlessignitecertificate.s3-sa-east-1.amazonaws.com/{key}")
    }
}
