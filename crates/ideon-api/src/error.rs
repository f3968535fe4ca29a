use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ideon_agent::EvalError;
use ideon_persist::PersistError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Idea not found: {0}")]
    IdeaNotFound(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Evaluation failed: {0}")]
    Upstream(#[from] EvalError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("BSON error: {0}")]
    Bson(#[from] bson::ser::Error),

    #[error("Upload error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            ApiError::IdeaNotFound(_) | ApiError::UserNotFound => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::EmailTaken => (StatusCode::BAD_REQUEST, self.to_string()),
            // An empty submission is a caller mistake, not an upstream outage
            ApiError::Upstream(EvalError::EmptyDescription) => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            ApiError::Upstream(ref e) => {
                tracing::error!("Pipeline error: {}", e);
                (StatusCode::BAD_GATEWAY, "Evaluation failed".to_string())
            }
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
            ApiError::Multipart(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Bson(_) | ApiError::Internal => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
