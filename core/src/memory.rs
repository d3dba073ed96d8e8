//! In-process `TodoRepository` with the same observable contract as the
//! ScyllaDB implementation.
//!
//! Rows are listed in the order of a deterministic 64-bit token derived from
//! the id, standing in for the store's partitioner. Like the real store, this
//! order is unrelated to creation time.
//!
//! Updates are upserts, as with CQL `UPDATE`: an unknown id gains a partial
//! row with an empty `user_id` and a zero `created`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::repository::TodoRepository;
use crate::types::{ListQuery, Todo};

#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    rows: RwLock<HashMap<Uuid, Todo>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Ordering token for an id. Stable for the lifetime of the process and
/// across runs.
pub fn partition_token(id: Uuid) -> i64 {
    let (hi, lo) = id.as_u64_pair();
    // splitmix64 finaliser
    let mut z = hi ^ lo.rotate_left(32);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    (z ^ (z >> 31)) as i64
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, todo: &Todo) -> Result<(), RepositoryError> {
        self.rows.write().await.insert(todo.id, todo.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Todo, RepositoryError> {
        self.rows
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn update(&self, todo: &Todo) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().await;
        let row = rows.entry(todo.id).or_insert_with(|| Todo {
            id: todo.id,
            user_id: String::new(),
            title: String::new(),
            description: String::new(),
            status: String::new(),
            created: 0,
            updated: 0,
        });
        row.title = todo.title.clone();
        row.description = todo.description.clone();
        row.status = todo.status.clone();
        row.updated = todo.updated;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        self.rows.write().await.remove(&id);
        Ok(())
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Todo>, RepositoryError> {
        let rows = self.rows.read().await;
        let status = query.status_filter();
        let after = query.last_page_token.map(partition_token);

        let mut matches: Vec<(i64, &Todo)> = rows
            .values()
            .map(|todo| (partition_token(todo.id), todo))
            .filter(|(token, _)| after.map_or(true, |after| *token > after))
            .filter(|(_, todo)| status.map_or(true, |status| todo.status == status))
            .collect();
        matches.sort_by_key(|(token, todo)| (*token, todo.id));

        let limit = usize::try_from(query.size).unwrap_or(0);
        Ok(matches
            .into_iter()
            .take(limit)
            .map(|(_, todo)| todo.clone())
            .collect())
    }
}
