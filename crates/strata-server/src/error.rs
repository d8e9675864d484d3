use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use strata_core::errors::{ExError, ExErrorKind};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] ExError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Domain(e) => match e.kind() {
                ExErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                ExErrorKind::NotFound => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Text placed in the `error` field of the response body
    pub fn public_message(&self) -> String {
        match self {
            AppError::Domain(e) if !e.message().is_empty() => e.message().to_string(),
            AppError::Domain(e) => e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
