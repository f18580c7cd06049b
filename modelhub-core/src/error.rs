//! Error type for the HTTP boundary.
//!
//! Wraps [`MlError`] and transport failures, and decides the status code each
//! one is reported with.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use modelhub_ml::MlError;
use modelhub_ml::error::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Ml(#[from] MlError),

    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Unknown models are 404, every other model error is the caller's input.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Ml(e) => match e.kind() {
                ErrorKind::ModelNotFound => StatusCode::NOT_FOUND,
                ErrorKind::Schema
                | ErrorKind::Range
                | ErrorKind::EmptyFeatureSet
                | ErrorKind::Training
                | ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            },
            Self::Rejected { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<tokio::task::JoinError> for GatewayError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        let body = serde_json::json!({ "detail": self.to_string() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GatewayError::from(MlError::model_not_found("m1")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GatewayError::from(MlError::EmptyFeatureSet).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::from(MlError::missing_columns(["target"])).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::from(MlError::training("single class")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::from(MlError::invalid_input("Unknown operation: pivot")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_message_passes_through() {
        let err = GatewayError::from(MlError::model_not_found("m1"));
        assert_eq!(err.to_string(), "Model 'm1' not found");
    }
}
