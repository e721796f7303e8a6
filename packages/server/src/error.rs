use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::metadata::MetadataError;
use common::resource::{ResourceError, ValidationError};
use common::storage::StorageError;
use serde::Serialize;

use crate::feed::BuildError;
use crate::production::ProductionError;
use crate::resources::RepositoryError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `PERMISSION_DENIED`, `NOT_FOUND`, `CONFLICT`,
    /// `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "invalid resource (1 violations): description.title: is required")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    PermissionDenied,
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    message: "Authentication required".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    message: "Invalid or expired token".into(),
                },
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "PERMISSION_DENIED",
                    message: "Insufficient permissions".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "CONFLICT",
                    message: msg,
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<ResourceError> for AppError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::KindUnsupported(_) | ResourceError::Malformed(_) => {
                AppError::Validation(err.to_string())
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(path) => AppError::NotFound(format!("'{path}' not found")),
            StorageError::InvalidPath(_) => AppError::Validation(err.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<MetadataError> for AppError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::Conflict(msg) => AppError::Conflict(msg),
            MetadataError::NotFound(msg) => AppError::NotFound(msg),
            MetadataError::Backend(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::AlreadyExists(_) => AppError::Conflict(err.to_string()),
            RepositoryError::NotFound(_) => AppError::NotFound(err.to_string()),
            RepositoryError::Invalid(e) => e.into(),
            RepositoryError::Document(e) => e.into(),
            RepositoryError::Store(e) => e.into(),
        }
    }
}

impl From<ProductionError> for AppError {
    fn from(err: ProductionError) -> Self {
        match err {
            ProductionError::InvalidName(_) => AppError::Validation(err.to_string()),
            ProductionError::Conflict(_) => AppError::Conflict(err.to_string()),
            ProductionError::NotFound(_) => AppError::NotFound(err.to_string()),
            ProductionError::Metadata(e) => e.into(),
            ProductionError::Repository(e) => e.into(),
        }
    }
}

impl From<BuildError> for AppError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::NotFound(_) | BuildError::MissingShow(_) => {
                AppError::NotFound(err.to_string())
            }
            BuildError::Invalid { .. } => AppError::Validation(err.to_string()),
            BuildError::NotImported { .. } => AppError::Conflict(err.to_string()),
            BuildError::Repository(e) => e.into(),
            BuildError::Store(e) => e.into(),
            BuildError::Metadata(e) => e.into(),
        }
    }
}
