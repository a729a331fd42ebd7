use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures raised inside the matching engine.
///
/// None of these are fatal to the service: startup degrades to an empty
/// recommender and requests degrade to an empty result.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Internship data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Cannot fit a feature space on an empty corpus")]
    EmptyCorpus,

    #[error("Invalid student profile: {0}")]
    InvalidProfile(String),
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<MatchError> for AppError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::DataUnavailable(msg) => AppError::DataUnavailable(msg),
            MatchError::EmptyCorpus => AppError::DataUnavailable(err.to_string()),
            MatchError::InvalidProfile(msg) => AppError::Validation(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::DataUnavailable(msg) => {
                tracing::error!("Data unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "DATA_UNAVAILABLE",
                    msg.clone(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
