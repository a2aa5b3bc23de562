//! Object storage for rendered certificates.
//!
//! # Backends
//!
//! - [`S3Client`] - AWS SDK client, also used for S3-compatible stores
//!
//! Objects are addressed by key only; the bucket is part of the backend's
//! configuration.

pub mod s3;

use async_trait::async_trait;
use thiserror::Error;

pub use s3::S3Client;

/// Content type of rendered certificates.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Errors that can occur when talking to the object store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store rejected the upload or could not be reached.
    #[error("upload of {key} failed: {message}")]
    Upload { key: String, message: String },
}

/// Canned access control list applied to an uploaded object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectAcl {
    Private,
    PublicRead,
}

impl ObjectAcl {
    /// Canned ACL name as sent in `x-amz-acl`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::PublicRead => "public-read",
        }
    }
}

/// An object to upload.
#[derive(Debug, Clone)]
pub struct PutObject {
    pub key: String,
    pub body: Vec<u8>,
    pub acl: ObjectAcl,
    pub content_type: &'static str,
}

impl PutObject {
    /// A publicly readable PDF stored at `key`.
    #[must_use]
    pub fn public_pdf(key: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            body,
            acl: ObjectAcl::PublicRead,
            content_type: PDF_CONTENT_TYPE,
        }
    }
}

/// Blob store holding certificate PDFs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `object`, replacing anything already at its key.
    async fn put_object(&self, object: PutObject) -> Result<(), StorageError>;

    /// Public URL at which `key` is served.
    fn public_url(&self, key: &str) -> String;
}
