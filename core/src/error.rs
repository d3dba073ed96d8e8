//! Error types for the data-access layer.
//!
//! # Design
//! `NotFound` gets a dedicated variant because handlers map it to 404. Every
//! other persistence failure is carried opaquely in `Store` with its source
//! preserved for logging.

use thiserror::Error;

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `TodoRepository` operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No row exists for the requested id.
    #[error("todo not found")]
    NotFound,

    /// The store rejected the statement or could not be reached.
    #[error("store error: {source}")]
    Store {
        #[source]
        source: DynError,
    },

    /// The store configuration is unusable.
    #[error("invalid store configuration: {0}")]
    Config(String),
}

impl RepositoryError {
    pub fn store<E>(err: E) -> Self
    where
        E: Into<DynError>,
    {
        RepositoryError::Store { source: err.into() }
    }
}
