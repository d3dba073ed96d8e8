//! HTTP surface of the todo service.
//!
//! # Design
//! The router is a static method+path table over five handlers with no
//! middleware. The only shared state is the repository, injected by the
//! caller as `Arc<dyn TodoRepository>`; tests pass the in-memory repository,
//! the binary passes the ScyllaDB one.

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;

use axum::{routing::get, Router};
use todo_core::SharedRepository;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::handlers::{create_todo, delete_todo, get_todo, list_todos, update_todo};

pub fn app(repo: SharedRepository) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .with_state(repo)
}

/// Serve until Ctrl+C or SIGTERM, letting in-flight requests finish.
pub async fn run(listener: TcpListener, repo: SharedRepository) -> Result<(), std::io::Error> {
    axum::serve(listener, app(repo))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("shutdown signal received");
}
