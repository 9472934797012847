/// Unified error types for the Lostpaw intake service
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum PetError {
    /// Submission arrived without an image part
    #[error("An image is required")]
    MissingImage,

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict errors (e.g., duplicate report id)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Object storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Report store errors that are not raw driver errors (timeouts, bad rows)
    #[error("Record store error: {0}")]
    RecordStore(String),

    /// Rate limiting errors
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PetError {
    /// HTTP status the error is surfaced with
    pub fn status_code(&self) -> StatusCode {
        match self {
            PetError::MissingImage | PetError::Validation(_) => StatusCode::BAD_REQUEST,
            PetError::NotFound(_) => StatusCode::NOT_FOUND,
            PetError::Conflict(_) => StatusCode::CONFLICT,
            PetError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            PetError::Storage(_)
            | PetError::Database(_)
            | PetError::RecordStore(_)
            | PetError::Io(_)
            | PetError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for PetError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .keys()
            .map(|k| k.to_string())
            .collect::<Vec<_>>();
        PetError::Validation(format!("invalid fields: {}", fields.join(", ")))
    }
}

/// Error envelope returned across the HTTP boundary
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Convert PetError to HTTP response
impl IntoResponse for PetError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            PetError::Database(e) => {
                tracing::error!(error = %e, "database failure");
                "Database error".to_string() // Don't leak details
            }
            PetError::Io(e) => {
                tracing::error!(error = %e, "io failure");
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Result type alias for service operations
pub type PetResult<T> = Result<T, PetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PetError::MissingImage.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            PetError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PetError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PetError::Storage("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            PetError::RecordStore("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_envelope_shape() {
        let response = PetError::MissingImage.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "An image is required");
        assert_eq!(json.as_object().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_database_details_not_leaked() {
        let response = PetError::Database(sqlx::Error::RowNotFound).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Database error");
    }
}
