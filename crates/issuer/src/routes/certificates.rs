//! Certificate issuing endpoint.

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use ignite_certificates_core::CertificatePayload;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Message returned with every successful issue.
pub const CREATED_MESSAGE: &str = "Certificate created!";

/// Response body for a successful issue.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CertificateCreated {
    pub message: String,
    pub url: String,
}

/// Issue a certificate.
///
/// Registers the holder on first sight, renders and uploads the PDF, and
/// returns its public URL. Calling again with the same id replaces the PDF.
///
/// The body is parsed as JSON whatever `Content-Type` the caller sent.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CertificateCreated>)> {
    let payload: CertificatePayload =
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let request = payload.validate()?;

    add_breadcrumb(
        "certificate",
        "Issue requested",
        Some(&[("id", request.id.as_str())]),
    );

    let issued = state.issuer().issue(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CertificateCreated {
            message: CREATED_MESSAGE.to_string(),
            url: issued.url,
        }),
    ))
}
