//! ScyllaDB implementation of `TodoRepository`.
//!
//! # Design
//! All statements are prepared once in [`ScyllaTodoRepository::new`] and
//! executed unpaged. Listing is a token-range scan: every list statement
//! carries `ALLOW FILTERING`, and the cursor variants bound the scan with
//! `token(id) > token(?)`. Rows come back in partitioner order.
//!
//! Timestamps are CQL `timestamp` (milliseconds) in storage and Unix seconds
//! on the entity.

use std::sync::Arc;

use async_trait::async_trait;
use scylla::client::session::Session;
use scylla::statement::prepared::PreparedStatement;
use scylla::value::CqlTimestamp;
use scylla::DeserializeRow;
use tracing::debug;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::repository::TodoRepository;
use crate::types::{ListQuery, Todo};

pub(crate) const INSERT_TODO: &str = "INSERT INTO todos (id, user_id, title, description, status, created, updated) VALUES (?, ?, ?, ?, ?, ?, ?)";
pub(crate) const SELECT_TODO: &str =
    "SELECT id, user_id, title, description, status, created, updated FROM todos WHERE id = ?";
pub(crate) const UPDATE_TODO: &str =
    "UPDATE todos SET title = ?, description = ?, status = ?, updated = ? WHERE id = ?";
pub(crate) const DELETE_TODO: &str = "DELETE FROM todos WHERE id = ?";

pub(crate) const LIST_TODOS: &str = "SELECT id, user_id, title, description, status, created, updated FROM todos LIMIT ? ALLOW FILTERING";
pub(crate) const LIST_TODOS_AFTER: &str = "SELECT id, user_id, title, description, status, created, updated FROM todos WHERE token(id) > token(?) LIMIT ? ALLOW FILTERING";
pub(crate) const LIST_TODOS_BY_STATUS: &str = "SELECT id, user_id, title, description, status, created, updated FROM todos WHERE status = ? LIMIT ? ALLOW FILTERING";
pub(crate) const LIST_TODOS_BY_STATUS_AFTER: &str = "SELECT id, user_id, title, description, status, created, updated FROM todos WHERE status = ? AND token(id) > token(?) LIMIT ? ALLOW FILTERING";

/// A row of the `todos` table.
///
/// Every non-key column is nullable: a CQL `UPDATE` against a missing id
/// upserts a row holding only the updated columns.
#[derive(Debug, DeserializeRow)]
struct TodoRow {
    id: Uuid,
    user_id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    created: Option<CqlTimestamp>,
    updated: Option<CqlTimestamp>,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo {
            id: row.id,
            user_id: row.user_id.unwrap_or_default(),
            title: row.title.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            status: row.status.unwrap_or_default(),
            created: timestamp_to_secs(row.created),
            updated: timestamp_to_secs(row.updated),
        }
    }
}

fn secs_to_timestamp(secs: i64) -> CqlTimestamp {
    CqlTimestamp(secs.saturating_mul(1000))
}

fn timestamp_to_secs(timestamp: Option<CqlTimestamp>) -> i64 {
    timestamp.map_or(0, |CqlTimestamp(millis)| millis.div_euclid(1000))
}

pub struct ScyllaTodoRepository {
    session: Arc<Session>,
    insert: PreparedStatement,
    select: PreparedStatement,
    update: PreparedStatement,
    delete: PreparedStatement,
    list: PreparedStatement,
    list_after: PreparedStatement,
    list_by_status: PreparedStatement,
    list_by_status_after: PreparedStatement,
}

impl ScyllaTodoRepository {
    /// Prepare every statement against `session`, which must already be
    /// using the todo keyspace (see [`crate::schema::connect`]).
    pub async fn new(session: Arc<Session>) -> Result<Self, RepositoryError> {
        Ok(Self {
            insert: prepare(&session, INSERT_TODO).await?,
            select: prepare(&session, SELECT_TODO).await?,
            update: prepare(&session, UPDATE_TODO).await?,
            delete: prepare(&session, DELETE_TODO).await?,
            list: prepare(&session, LIST_TODOS).await?,
            list_after: prepare(&session, LIST_TODOS_AFTER).await?,
            list_by_status: prepare(&session, LIST_TODOS_BY_STATUS).await?,
            list_by_status_after: prepare(&session, LIST_TODOS_BY_STATUS_AFTER).await?,
            session,
        })
    }
}

async fn prepare(session: &Session, cql: &'static str) -> Result<PreparedStatement, RepositoryError> {
    session.prepare(cql).await.map_err(RepositoryError::store)
}

#[async_trait]
impl TodoRepository for ScyllaTodoRepository {
    async fn create(&self, todo: &Todo) -> Result<(), RepositoryError> {
        debug!(id = %todo.id, "inserting todo");
        self.session
            .execute_unpaged(
                &self.insert,
                (
                    todo.id,
                    todo.user_id.as_str(),
                    todo.title.as_str(),
                    todo.description.as_str(),
                    todo.status.as_str(),
                    secs_to_timestamp(todo.created),
                    secs_to_timestamp(todo.updated),
                ),
            )
            .await
            .map_err(RepositoryError::store)?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Todo, RepositoryError> {
        let rows = self
            .session
            .execute_unpaged(&self.select, (id,))
            .await
            .map_err(RepositoryError::store)?
            .into_rows_result()
            .map_err(RepositoryError::store)?;

        rows.maybe_first_row::<TodoRow>()
            .map_err(RepositoryError::store)?
            .map(Todo::from)
            .ok_or(RepositoryError::NotFound)
    }

    async fn update(&self, todo: &Todo) -> Result<(), RepositoryError> {
        debug!(id = %todo.id, "updating todo");
        self.session
            .execute_unpaged(
                &self.update,
                (
                    todo.title.as_str(),
                    todo.description.as_str(),
                    todo.status.as_str(),
                    secs_to_timestamp(todo.updated),
                    todo.id,
                ),
            )
            .await
            .map_err(RepositoryError::store)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        debug!(%id, "deleting todo");
        self.session
            .execute_unpaged(&self.delete, (id,))
            .await
            .map_err(RepositoryError::store)?;
        Ok(())
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Todo>, RepositoryError> {
        let limit = query.size;
        let result = match (query.status_filter(), query.last_page_token) {
            (None, None) => self.session.execute_unpaged(&self.list, (limit,)).await,
            (None, Some(after)) => {
                self.session
                    .execute_unpaged(&self.list_after, (after, limit))
                    .await
            }
            (Some(status), None) => {
                self.session
                    .execute_unpaged(&self.list_by_status, (status, limit))
                    .await
            }
            (Some(status), Some(after)) => {
                self.session
                    .execute_unpaged(&self.list_by_status_after, (status, after, limit))
                    .await
            }
        }
        .map_err(RepositoryError::store)?;

        let rows = result.into_rows_result().map_err(RepositoryError::store)?;
        rows.rows::<TodoRow>()
            .map_err(RepositoryError::store)?
            .map(|row| row.map(Todo::from).map_err(RepositoryError::store))
            .collect()
    }
}
