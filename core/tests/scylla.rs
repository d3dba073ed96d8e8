//! Repository contract tests against a live ScyllaDB node.
//!
//! # Design
//! Ignored by default. Run with `cargo test -p todo-core -- --ignored` and a
//! node reachable at `SCYLLA_URI` (default `127.0.0.1:9042`). Every test
//! works on rows it created itself, and list tests filter on a status unique
//! to the test, so runs can share the `todo_app_test` keyspace.

use std::sync::Arc;

use todo_core::schema::connect;
use todo_core::types::{new_todo_id, unix_now};
use todo_core::{ListQuery, RepositoryError, ScyllaTodoRepository, StoreConfig, Todo, TodoRepository};
use uuid::Uuid;

async fn repository() -> ScyllaTodoRepository {
    let node = std::env::var("SCYLLA_URI").unwrap_or_else(|_| "127.0.0.1:9042".to_string());
    let config = StoreConfig {
        known_nodes: vec![node],
        keyspace: "todo_app_test".to_string(),
        replication_factor: 1,
    };
    let session = connect(&config).await.expect("connect to scylla");
    ScyllaTodoRepository::new(Arc::new(session))
        .await
        .expect("prepare statements")
}

fn todo(title: &str, status: &str) -> Todo {
    let now = unix_now();
    Todo {
        id: new_todo_id(),
        user_id: "u1".to_string(),
        title: title.to_string(),
        description: "from the live test".to_string(),
        status: status.to_string(),
        created: now,
        updated: now,
    }
}

#[tokio::test]
#[ignore = "requires a running ScyllaDB"]
async fn create_get_update_delete() {
    let repo = repository().await;
    let created = todo("live", "open");

    repo.create(&created).await.unwrap();
    assert_eq!(repo.get_by_id(created.id).await.unwrap(), created);

    let changed = Todo {
        user_id: "intruder".to_string(),
        title: "renamed".to_string(),
        status: "done".to_string(),
        updated: created.updated + 5,
        ..created.clone()
    };
    repo.update(&changed).await.unwrap();
    let stored = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(stored.user_id, "u1");
    assert_eq!(stored.title, "renamed");
    assert_eq!(stored.status, "done");
    assert_eq!(stored.created, created.created);
    assert_eq!(stored.updated, created.updated + 5);

    repo.delete(created.id).await.unwrap();
    assert!(matches!(
        repo.get_by_id(created.id).await,
        Err(RepositoryError::NotFound)
    ));
    repo.delete(created.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running ScyllaDB"]
async fn keyset_pagination_over_status() {
    let repo = repository().await;
    let status = format!("batch-{}", Uuid::new_v4());
    let mut ids = Vec::new();
    for i in 0..7 {
        let item = todo(&format!("item {i}"), &status);
        repo.create(&item).await.unwrap();
        ids.push(item.id);
    }

    let mut seen = Vec::new();
    let mut cursor = None;
    loop {
        let query = ListQuery {
            status: Some(status.clone()),
            size: 3,
            last_page_token: cursor,
            ..Default::default()
        };
        let page = repo.list(&query).await.unwrap();
        if page.is_empty() {
            break;
        }
        assert!(page.iter().all(|t| t.status == status));
        assert!(page.iter().all(|t| Some(t.id) != cursor));
        cursor = page.last().map(|t| t.id);
        seen.extend(page.into_iter().map(|t| t.id));
    }

    seen.sort();
    ids.sort();
    assert_eq!(seen, ids);

    for id in ids {
        repo.delete(id).await.unwrap();
    }
}

#[tokio::test]
#[ignore = "requires a running ScyllaDB"]
async fn update_of_unknown_id_upserts_partial_row() {
    let repo = repository().await;
    let ghost = todo("ghost", "done");

    repo.update(&ghost).await.unwrap();
    let stored = repo.get_by_id(ghost.id).await.unwrap();
    assert_eq!(stored.user_id, "");
    assert_eq!(stored.created, 0);
    assert_eq!(stored.title, "ghost");
    assert_eq!(stored.status, "done");
    assert_eq!(stored.updated, ghost.updated);

    repo.delete(ghost.id).await.unwrap();
}
