//! The data-access capability used by the HTTP handlers.
//!
//! Implementations: [`crate::scylla_repository::ScyllaTodoRepository`] for
//! the real store and [`crate::memory::InMemoryTodoRepository`] for tests and
//! local wiring. Handlers only ever see `Arc<dyn TodoRepository>`.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::types::{ListQuery, Todo};

pub type SharedRepository = Arc<dyn TodoRepository>;

#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Insert a fully populated row. Id and timestamps are assigned by the
    /// caller.
    async fn create(&self, todo: &Todo) -> Result<(), RepositoryError>;

    /// Fetch one row, or `RepositoryError::NotFound`.
    async fn get_by_id(&self, id: Uuid) -> Result<Todo, RepositoryError>;

    /// Write title, description, status and updated for `todo.id`.
    ///
    /// No existence check is made; updating an unknown id succeeds and
    /// leaves a partial row (empty `user_id`, zero `created`).
    async fn update(&self, todo: &Todo) -> Result<(), RepositoryError>;

    /// Remove a row. Deleting an unknown id is not an error.
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;

    /// Return up to `query.size` rows in partition-token order, optionally
    /// filtered by status and starting strictly after `last_page_token`.
    async fn list(&self, query: &ListQuery) -> Result<Vec<Todo>, RepositoryError>;
}
