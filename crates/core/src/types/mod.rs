//! Core types for Ignite Certificates.
//!
//! This module provides type-safe wrappers for the certificate domain.

pub mod id;
pub mod record;
pub mod request;

pub use id::{CertificateId, CertificateIdError};
pub use record::UserCertificateRecord;
pub use request::{CertificatePayload, CertificateRequest, RequestError};
