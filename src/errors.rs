use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Unprocessable Entity")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

/// Typed failure taxonomy for the movement processor and the services
/// around it. Every precondition violation is a recoverable variant the
/// caller can match on; partial writes never happen.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Item {0} not found")]
    ItemNotFound(Uuid),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Movement quantity cannot be zero")]
    ZeroQuantity,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unknown movement type: {0}")]
    UnknownMovementType(String),

    #[error("Insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: i32, requested: i32 },

    #[error("Insufficient asset stock: available {available}, requested {requested}")]
    InsufficientAssetStock { available: i32, requested: i32 },

    #[error("Concurrent modification of item {0}")]
    ConcurrentModification(Uuid),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Wraps a storage failure, surfacing connection-level problems as
    /// `StorageUnavailable` so callers can retry them with backoff while
    /// other database errors stay terminal.
    pub fn storage(err: DbErr) -> Self {
        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
                ServiceError::StorageUnavailable(err.to_string())
            }
            other => ServiceError::DatabaseError(other),
        }
    }

    /// Single source of truth for the error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ItemNotFound(_) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ZeroQuantity
            | Self::MissingField(_)
            | Self::UnknownMovementType(_)
            | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::InsufficientStock { .. } | Self::InsufficientAssetStock { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Conflict(_) | Self::ConcurrentModification(_) => StatusCode::CONFLICT,
            Self::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Message suitable for HTTP responses. Internal errors return generic
    /// text instead of leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::InternalError(_) => "Internal server error".to_string(),
            Self::StorageUnavailable(_) => "Storage temporarily unavailable".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use sea_orm::RuntimeErr;

    #[test]
    fn status_code_mapping() {
        assert_eq!(
            ServiceError::ItemNotFound(Uuid::nil()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::ZeroQuantity.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::MissingField("numero_chamado").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::UnknownMovementType("AJUSTE".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::InsufficientStock {
                available: 1,
                requested: 2
            }
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServiceError::InsufficientAssetStock {
                available: 0,
                requested: 1
            }
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServiceError::ConcurrentModification(Uuid::nil()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::StorageUnavailable("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn response_message_hides_internal_details() {
        let err = ServiceError::DatabaseError(DbErr::Custom("table items is on fire".into()));
        assert_eq!(err.response_message(), "Database error");

        let err = ServiceError::InsufficientStock {
            available: 2,
            requested: 5,
        };
        assert_eq!(
            err.response_message(),
            "Insufficient stock: available 2, requested 5"
        );
    }

    #[test]
    fn connection_failures_classify_as_storage_unavailable() {
        let err = ServiceError::storage(DbErr::Conn(RuntimeErr::Internal("refused".into())));
        assert!(matches!(err, ServiceError::StorageUnavailable(_)));

        let err = ServiceError::storage(DbErr::Custom("constraint".into()));
        assert!(matches!(err, ServiceError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn error_response_serializes_status_and_message() {
        let response = ServiceError::ItemNotFound(Uuid::nil()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.error, "Not Found");
        assert!(payload.message.contains("not found"));
    }
}
