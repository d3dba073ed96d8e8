use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use todo_core::RepositoryError;
use tracing::error;

/// Failures a handler can answer with. The display text is the plain-text
/// response body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed id, body or pagination parameter.
    #[error("{0}")]
    Validation(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    /// The repository failed. `source` is logged, never sent to the client.
    #[error("{message}")]
    Store {
        message: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl ApiError {
    /// Wrap a repository failure, keeping `NotFound` distinct.
    pub fn from_repository(message: &'static str) -> impl FnOnce(RepositoryError) -> ApiError {
        move |source| match source {
            RepositoryError::NotFound => ApiError::NotFound("Todo item not found"),
            source => ApiError::Store { message, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Store { message, source } = &self {
            error!(error = %source, "{message}");
        }
        (self.status(), self.to_string()).into_response()
    }
}
