use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::dto::ErrorResponse;
use crate::services::emotion_client::ClassifierError;
use crate::storage::repository::RepositoryError;

/// Every way a conversation request can fail, as seen by the caller.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Emotion API credentials not configured.")]
    Configuration,
    #[error("Emotion API returned an error: {status} {message}")]
    Upstream { status: u16, message: String },
    #[error("Invalid response from Emotion API.")]
    InvalidResponse,
    #[error("An error occurred while detecting emotion: {0}")]
    Classification(String),
    #[error("Failed to store conversation.")]
    Storage,
    #[error("Invalid request body: {0}")]
    Validation(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ClassifierError> for ApiError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::NotConfigured => ApiError::Configuration,
            ClassifierError::Upstream { status, message } => ApiError::Upstream { status, message },
            ClassifierError::InvalidResponse(reason) => {
                tracing::error!("Emotion API response rejected: {}", reason);
                ApiError::InvalidResponse
            }
            ClassifierError::Transport(e) => ApiError::Classification(e.to_string()),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        tracing::error!("Conversation write failed: {}", err);
        ApiError::Storage
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        let body = ErrorResponse {
            detail: self.to_string(),
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
