//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//! Every error is answered with a JSON body of the form `{"error": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use ignite_certificates_core::RequestError;

use crate::services::IssueError;

/// Application-level error type for the issuer.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body parsed but failed validation.
    #[error("Invalid request: {0}")]
    Validation(#[from] RequestError),

    /// Request body was not JSON of the expected shape.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The issuing pipeline failed.
    #[error("Issue failed: {0}")]
    Issue(#[from] IssueError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Issue(
                IssueError::Repository(_)
                | IssueError::Template(_)
                | IssueError::DebugOutput { .. },
            ) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Issue(IssueError::Render(_) | IssueError::Storage(_)) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Validation(_) | Self::BadRequest(_) => self.to_string(),
            Self::Issue(IssueError::Render(_)) => "Certificate rendering failed".to_string(),
            Self::Issue(IssueError::Storage(_)) => "Certificate upload failed".to_string(),
            Self::Issue(_) => "Internal server error".to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for issuer actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("certificate", "Issue requested", Some(&[("id", "u1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
