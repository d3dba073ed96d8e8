//! Entity model and data-access layer for the todo service.
//!
//! # Overview
//! `TodoRepository` is the capability the HTTP layer depends on. It has a
//! ScyllaDB implementation for production and an in-memory one with the same
//! contract for tests.
//!
//! # Design
//! - The session is built once by [`schema::connect`] and handed to
//!   [`ScyllaTodoRepository::new`]; nothing is global.
//! - Listing uses keyset pagination over the partitioner's token order. The
//!   cursor is the id of the last row seen; `page` is accepted and ignored.
//! - Errors carry no retry logic. `NotFound` is the only distinguished
//!   failure.

pub mod error;
pub mod memory;
pub mod repository;
pub mod schema;
pub mod scylla_repository;
pub mod types;

pub use error::RepositoryError;
pub use memory::InMemoryTodoRepository;
pub use repository::{SharedRepository, TodoRepository};
pub use schema::StoreConfig;
pub use scylla_repository::ScyllaTodoRepository;
pub use types::{ListQuery, Todo, TodoPayload, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
