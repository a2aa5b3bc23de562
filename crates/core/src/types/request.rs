//! Inbound certificate requests.
//!
//! A [`CertificatePayload`] is what arrives on the wire: every field is
//! optional so a missing field surfaces as a [`RequestError`] rather than an
//! opaque deserialization failure. [`CertificatePayload::validate`] turns it
//! into a [`CertificateRequest`], which is the only form the issuer accepts.

use serde::{Deserialize, Serialize};

use super::id::{CertificateId, CertificateIdError};

/// Errors produced while validating a [`CertificatePayload`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// A required field was absent from the payload.
    #[error("missing field: {0}")]
    MissingField(&'static str),
    /// A required field was present but blank.
    #[error("field cannot be blank: {0}")]
    BlankField(&'static str),
    /// A field exceeded its maximum length.
    #[error("field {field} must be at most {max} characters")]
    TooLong {
        /// Field name.
        field: &'static str,
        /// Maximum allowed length in characters.
        max: usize,
    },
    /// The id failed validation.
    #[error("invalid id: {0}")]
    InvalidId(#[from] CertificateIdError),
}

/// Raw request body as posted by clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertificatePayload {
    pub id: Option<String>,
    pub name: Option<String>,
    pub grade: Option<String>,
}

/// A validated certificate request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRequest {
    pub id: CertificateId,
    pub name: String,
    pub grade: String,
}

impl CertificateRequest {
    /// Maximum length of the holder's name, in characters.
    pub const MAX_NAME_LENGTH: usize = 200;
    /// Maximum length of the grade, in characters.
    pub const MAX_GRADE_LENGTH: usize = 32;

    /// Build a request from already-trusted parts.
    ///
    /// # Errors
    ///
    /// Returns `RequestError` under the same rules as
    /// [`CertificatePayload::validate`].
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        grade: impl Into<String>,
    ) -> Result<Self, RequestError> {
        CertificatePayload {
            id: Some(id.into()),
            name: Some(name.into()),
            grade: Some(grade.into()),
        }
        .validate()
    }
}

impl CertificatePayload {
    /// Validate the payload.
    ///
    /// Name and grade are trimmed; the id is taken verbatim.
    ///
    /// # Errors
    ///
    /// Returns `RequestError` if a field is missing, blank, too long, or the
    /// id is not a valid [`CertificateId`].
    pub fn validate(self) -> Result<CertificateRequest, RequestError> {
        let id = self.id.ok_or(RequestError::MissingField("id"))?;
        let id = CertificateId::parse(&id)?;

        let name = required_text(self.name, "name", CertificateRequest::MAX_NAME_LENGTH)?;
        let grade = required_text(self.grade, "grade", CertificateRequest::MAX_GRADE_LENGTH)?;

        Ok(CertificateRequest { id, name, grade })
    }
}

fn required_text(
    value: Option<String>,
    field: &'static str,
    max: usize,
) -> Result<String, RequestError> {
    let value = value.ok_or(RequestError::MissingField(field))?;
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(RequestError::BlankField(field));
    }
    if trimmed.chars().count() > max {
        return Err(RequestError::TooLong { field, max });
    }

    Ok(trimmed.to_owned())
}
