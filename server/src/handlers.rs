//! Request handlers. Each one validates its input, calls exactly one
//! repository operation, and maps the outcome to a status code.
//!
//! Bodies are taken as raw bytes and decoded here, so the request content
//! type does not matter and every decode failure is a 400.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use todo_core::types::unix_now;
use todo_core::{ListQuery, SharedRepository, Todo, TodoPayload, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;

/// Raw list query string. Values stay strings so that parse failures get
/// our own messages; empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
    #[serde(rename = "lastPageToken")]
    pub last_page_token: Option<String>,
}

impl ListParams {
    /// Validate into a repository query. `page` must be an integer but its
    /// value is passed through unused.
    pub fn into_query(self) -> Result<ListQuery, ApiError> {
        let page = match non_empty(self.page) {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| ApiError::Validation("Invalid page number"))?,
            None => DEFAULT_PAGE,
        };
        let size = match non_empty(self.size) {
            Some(raw) => raw
                .parse::<i32>()
                .map_err(|_| ApiError::Validation("Invalid page size"))?,
            None => DEFAULT_PAGE_SIZE,
        };
        if size < 1 {
            return Err(ApiError::Validation("Invalid page size"));
        }
        let last_page_token = non_empty(self.last_page_token)
            .map(|raw| Uuid::parse_str(&raw))
            .transpose()
            .map_err(|_| ApiError::Validation("Invalid page token"))?;

        Ok(ListQuery {
            status: non_empty(self.status),
            page,
            size,
            last_page_token,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::Validation("Invalid todo ID"))
}

fn parse_body(body: &[u8]) -> Result<TodoPayload, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::Validation("Invalid request body"))
}

pub async fn create_todo(
    State(repo): State<SharedRepository>,
    body: Bytes,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let payload = parse_body(&body)?;
    if payload.title.as_deref().unwrap_or_default().is_empty() {
        return Err(ApiError::Validation("Title is required"));
    }
    if payload.user_id.as_deref().unwrap_or_default().is_empty() {
        return Err(ApiError::Validation("UserID is required"));
    }

    let todo = Todo::create_from(payload, unix_now());
    repo.create(&todo)
        .await
        .map_err(ApiError::from_repository("Failed to create TODO item"))?;

    debug!(id = %todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn get_todo(
    State(repo): State<SharedRepository>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    let todo = repo
        .get_by_id(id)
        .await
        .map_err(ApiError::from_repository("Failed to retrieve TODO item"))?;
    Ok(Json(todo))
}

pub async fn update_todo(
    State(repo): State<SharedRepository>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let payload = parse_body(&body)?;
    if payload.id != Some(id) {
        return Err(ApiError::Validation("Todo ID mismatch"));
    }

    let todo = Todo::updated_from(id, payload, unix_now());
    repo.update(&todo)
        .await
        .map_err(ApiError::from_repository("Failed to update TODO item"))?;

    debug!(%id, "updated todo");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_todo(
    State(repo): State<SharedRepository>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    repo.delete(id)
        .await
        .map_err(ApiError::from_repository("Failed to delete TODO item"))?;

    debug!(%id, "deleted todo");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_todos(
    State(repo): State<SharedRepository>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let Query(params) = params.map_err(|_| ApiError::Validation("Invalid query string"))?;
    let query = params.into_query()?;
    let todos = repo
        .list(&query)
        .await
        .map_err(ApiError::from_repository("Failed to fetch TODO items"))?;

    debug!(count = todos.len(), "listed todos");
    Ok(Json(todos))
}
