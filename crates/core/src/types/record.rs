//! Persisted certificate registrations.

use serde::{Deserialize, Serialize};

use super::id::CertificateId;
use super::request::CertificateRequest;

/// A registered certificate holder.
///
/// Created on the first request for an id and never mutated afterwards:
/// later requests with a different name or grade leave it untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCertificateRecord {
    pub id: CertificateId,
    pub name: String,
    pub grade: String,
}

impl From<&CertificateRequest> for UserCertificateRecord {
    fn from(request: &CertificateRequest) -> Self {
        Self {
            id: request.id.clone(),
            name: request.name.clone(),
            grade: request.grade.clone(),
        }
    }
}
