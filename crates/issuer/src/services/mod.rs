//! Business logic services.

pub mod issuer;
pub mod renderer;
pub mod storage;
pub mod template;

pub use issuer::{CertificateIssuer, IssueError, IssuedCertificate};
pub use renderer::{ChromeRenderer, PdfOptions, PdfRenderer, RenderError};
pub use storage::{ObjectStore, S3Client, StorageError};
pub use template::{CertificateTemplates, TemplateError};
