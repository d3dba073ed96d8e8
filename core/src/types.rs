//! Domain types for the todo service.
//!
//! # Design
//! `Todo` is the persisted entity and its JSON wire shape at the same time.
//! Request bodies decode into `TodoPayload` instead, whose fields are all
//! optional so that presence checks happen in the handlers rather than in
//! serde; a field that is present but has the wrong type still fails to
//! decode.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Page number assumed when the caller does not supply one.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size assumed when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: i32 = 10;

/// A single todo item as stored and as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    /// Unix seconds, set once at creation.
    pub created: i64,
    /// Unix seconds, refreshed on every mutation.
    pub updated: i64,
}

impl Todo {
    /// Build a new entity from a create payload, assigning a fresh
    /// time-ordered id and stamping both timestamps with `now`.
    ///
    /// Any `id`, `created` or `updated` carried by the payload is discarded.
    pub fn create_from(payload: TodoPayload, now: i64) -> Self {
        Self {
            id: new_todo_id(),
            user_id: payload.user_id.unwrap_or_default(),
            title: payload.title.unwrap_or_default(),
            description: payload.description.unwrap_or_default(),
            status: payload.status.unwrap_or_default(),
            created: now,
            updated: now,
        }
    }

    /// Build the entity handed to an update of `id`. Only title,
    /// description, status and `updated` (set to `now`) are persisted; the
    /// other fields echo the payload and are never written.
    pub fn updated_from(id: Uuid, payload: TodoPayload, now: i64) -> Self {
        Self {
            id,
            user_id: payload.user_id.unwrap_or_default(),
            title: payload.title.unwrap_or_default(),
            description: payload.description.unwrap_or_default(),
            status: payload.status.unwrap_or_default(),
            created: payload.created.unwrap_or_default(),
            updated: now,
        }
    }
}

/// Request body for create and update.
///
/// Mirrors the `Todo` wire shape with every field optional, so a client may
/// send back an entity it previously fetched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
}

/// Parameters of a list call.
///
/// Pagination is keyset based: `last_page_token` is the id of the last item
/// of the previous page and only rows whose partition token is strictly
/// greater are returned. `page` is accepted for compatibility with existing
/// clients and is ignored by every repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub status: Option<String>,
    pub page: i64,
    pub size: i32,
    pub last_page_token: Option<Uuid>,
}

impl ListQuery {
    /// The status to filter on, if any. An empty status means no filter.
    pub fn status_filter(&self) -> Option<&str> {
        self.status.as_deref().filter(|status| !status.is_empty())
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            status: None,
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
            last_page_token: None,
        }
    }
}

/// Generate a new todo id. Version 7 ids lead with the Unix millisecond
/// timestamp, so id order approximates creation order.
pub fn new_todo_id() -> Uuid {
    Uuid::now_v7()
}

/// Current time in Unix seconds.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_with_snake_case_names() {
        let todo = Todo {
            id: Uuid::nil(),
            user_id: "u1".to_string(),
            title: "Test".to_string(),
            description: String::new(),
            status: "open".to_string(),
            created: 10,
            updated: 20,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["title"], "Test");
        assert_eq!(json["description"], "");
        assert_eq!(json["status"], "open");
        assert_eq!(json["created"], 10);
        assert_eq!(json["updated"], 20);
    }

    #[test]
    fn payload_accepts_empty_object() {
        let payload: TodoPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.id.is_none());
        assert!(payload.title.is_none());
        assert!(payload.user_id.is_none());
    }

    #[test]
    fn payload_accepts_null_strings() {
        let payload: TodoPayload =
            serde_json::from_str(r#"{"title":"a","description":null}"#).unwrap();
        assert_eq!(payload.title.as_deref(), Some("a"));
        assert!(payload.description.is_none());
    }

    #[test]
    fn payload_rejects_malformed_id() {
        let result: Result<TodoPayload, _> = serde_json::from_str(r#"{"id":"not-a-uuid"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn payload_rejects_wrongly_typed_title() {
        let result: Result<TodoPayload, _> = serde_json::from_str(r#"{"title":5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn create_from_overwrites_client_identity_and_timestamps() {
        let payload = TodoPayload {
            id: Some(Uuid::nil()),
            user_id: Some("u1".to_string()),
            title: Some("buy milk".to_string()),
            created: Some(1),
            updated: Some(2),
            ..Default::default()
        };
        let todo = Todo::create_from(payload, 1_700_000_000);
        assert_ne!(todo.id, Uuid::nil());
        assert_eq!(todo.created, 1_700_000_000);
        assert_eq!(todo.updated, todo.created);
        assert_eq!(todo.status, "");
        assert_eq!(todo.description, "");
    }

    #[test]
    fn new_ids_are_unique_and_time_ordered() {
        let a = new_todo_id();
        let b = new_todo_id();
        assert_ne!(a, b);
        assert_eq!(a.get_version_num(), 7);
        // Millisecond prefix never goes backwards.
        assert!(a.as_bytes()[..6] <= b.as_bytes()[..6]);
    }

    #[test]
    fn list_query_defaults() {
        let query = ListQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.size, 10);
        assert!(query.status.is_none());
        assert!(query.last_page_token.is_none());
    }
}
