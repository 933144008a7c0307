//! HTTP error conversion
//!
//! The external contract collapses internals: both reject reasons
//! render as `400 ImageNotSunset`, and credential/persistence failures
//! both render as `500 Internal Server Error` while being logged
//! distinctly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sunsetmap_core::AppError;
use sunsetmap_storage::StorageError;

use crate::services::submission::SubmissionError;

const INTERNAL_BODY: &str = "Internal Server Error";

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        match self {
            SubmissionError::Invalid(message) => {
                tracing::debug!(error = %message, "Invalid submission");
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            SubmissionError::Decode(e) => {
                tracing::debug!(error = %e, "Malformed upload");
                (StatusCode::BAD_REQUEST, "InvalidImage".to_string()).into_response()
            }
            SubmissionError::Rejected(_) => {
                (StatusCode::BAD_REQUEST, "ImageNotSunset".to_string()).into_response()
            }
            SubmissionError::Classifier(e) => {
                tracing::error!(error = %e, "Classifier failure");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_BODY).into_response()
            }
            SubmissionError::Credential(e) => {
                tracing::error!(error = %e, "Credential issuance failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_BODY).into_response()
            }
            SubmissionError::Persistence(e) => {
                tracing::error!(error = %e, "Record persistence failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_BODY).into_response()
            }
        }
    }
}

/// Error wrapper for the read endpoints.
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(err: AppError) -> Self {
        HttpError(err)
    }
}

impl From<StorageError> for HttpError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "Credential issuance failed");
        HttpError(AppError::Internal(err.to_string()))
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let HttpError(err) = self;
        if err.is_client_error() {
            tracing::debug!(error = %err, code = err.error_code(), "Client error");
            let status = match err {
                AppError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            };
            (status, err.to_string()).into_response()
        } else {
            tracing::error!(error = %err, code = err.error_code(), "Request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_BODY).into_response()
        }
    }
}
