use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::catalog::CatalogError;
use crate::context::ContextError;
use crate::docs::DocTreeError;

/// Message shown in production instead of internal error details.
pub const GENERIC_MESSAGE: &str = "Something went wrong";

/// An error response in the `{ success: false, error, message }` envelope.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: String,
    branch: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

impl ApiError {
    /// Log an internal error and build a 500 response.
    ///
    /// The full error is always logged server-side; clients only see it
    /// outside production.
    fn internal(error: &'static str, source: impl std::fmt::Display, production: bool) -> Self {
        let detail = source.to_string();
        tracing::error!("{}: {}", error, detail);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error,
            message: if production {
                GENERIC_MESSAGE.to_string()
            } else {
                detail
            },
            branch: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Branch listing failures carry the git diagnostic in every environment.
    pub fn branches(err: CatalogError) -> Self {
        let CatalogError::Retrieval { message } = err;
        tracing::error!("Failed to retrieve branches: {}", message);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "Failed to retrieve branches",
            message,
            branch: None,
        }
    }

    pub fn context(err: ContextError, production: bool) -> Self {
        match err {
            ContextError::NotFound { branch } => {
                tracing::warn!(branch = %branch, "Branch context not found");
                Self {
                    status: StatusCode::NOT_FOUND,
                    error: "Branch context not found",
                    message: format!("No context file for branch {}", branch),
                    branch: Some(branch),
                }
            }
            err => Self::internal("Failed to retrieve branch context", err, production),
        }
    }

    pub fn docs(err: DocTreeError, production: bool) -> Self {
        Self::internal("Failed to build documentation structure", err, production)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.error,
            message: &self.message,
            branch: self.branch.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_error() -> ContextError {
        ContextError::Parse {
            path: "context/modules-a.json".to_string(),
            source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        }
    }

    #[test]
    fn not_found_context_maps_to_404() {
        let err = ApiError::context(
            ContextError::NotFound {
                branch: "modules/a".to_string(),
            },
            true,
        );
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.branch.as_deref(), Some("modules/a"));
    }

    #[test]
    fn parse_error_details_hidden_in_production() {
        let err = ApiError::context(parse_error(), true);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, GENERIC_MESSAGE);

        let err = ApiError::context(parse_error(), false);
        assert!(err.message.contains("context/modules-a.json"));
    }

    #[test]
    fn retrieval_message_always_shown() {
        let err = ApiError::branches(CatalogError::Retrieval {
            message: "fatal: not a git repository".to_string(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "fatal: not a git repository");
    }
}
