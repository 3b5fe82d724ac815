//! Error types for block registration, rendering, and the HTTP layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors raised while registering or rendering block types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    /// A block type with this identifier is already registered.
    #[error("block type '{identifier}' is already registered")]
    DuplicateRegistration { identifier: String },

    /// The identifier is not a valid `namespace/name` pair.
    #[error("invalid block type identifier '{identifier}': {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    /// No block type with this identifier has been registered.
    #[error("unknown block type '{identifier}'")]
    UnknownBlockType { identifier: String },

    /// The template renderer has no template for this name.
    #[error("template not found: {template}")]
    TemplateNotFound { template: String },

    /// The template exists but failed to render.
    #[error("failed to render template '{template}': {message}")]
    Template { template: String, message: String },

    /// The ready event has already fired for this lifecycle.
    #[error("lifecycle ready event already fired")]
    LifecycleAlreadyFired,
}

impl BlockError {
    /// Create a duplicate registration error.
    pub fn duplicate(identifier: impl Into<String>) -> Self {
        Self::DuplicateRegistration {
            identifier: identifier.into(),
        }
    }

    /// Create an unknown block type error.
    pub fn unknown(identifier: impl Into<String>) -> Self {
        Self::UnknownBlockType {
            identifier: identifier.into(),
        }
    }

    /// Create a template-not-found error.
    pub fn template_not_found(template: impl Into<String>) -> Self {
        Self::TemplateNotFound {
            template: template.into(),
        }
    }
}

/// Result type alias using BlockError.
pub type BlockResult<T> = Result<T, BlockError>;

/// HTTP application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error(transparent)]
    Block(#[from] BlockError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Block(BlockError::UnknownBlockType { .. }) => StatusCode::NOT_FOUND,
            AppError::Block(BlockError::InvalidIdentifier { .. }) => StatusCode::BAD_REQUEST,
            AppError::Block(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server-side failures are logged with detail; clients get a short message
        let body = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
                "internal server error".to_string()
            }
            AppError::Block(e) if status.is_server_error() => {
                tracing::error!(error = %e, "block render failed");
                "block render failed".to_string()
            }
            _ => self.to_string(),
        };

        (status, body).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_subject() {
        assert_eq!(
            BlockError::duplicate("ns/column").to_string(),
            "block type 'ns/column' is already registered"
        );
        assert_eq!(
            BlockError::template_not_found("column").to_string(),
            "template not found: column"
        );
        assert_eq!(
            BlockError::unknown("ns/missing").to_string(),
            "unknown block type 'ns/missing'"
        );
    }

    #[test]
    fn app_error_status_codes() {
        assert_eq!(
            AppError::from(BlockError::unknown("ns/x")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(BlockError::InvalidIdentifier {
                identifier: "x".into(),
                reason: "missing namespace".into(),
            })
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(BlockError::template_not_found("x")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
