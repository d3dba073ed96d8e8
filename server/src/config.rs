use clap::Parser;
use todo_core::schema::{DEFAULT_KEYSPACE, DEFAULT_NODE};
use todo_core::StoreConfig;

/// Command line and environment configuration for the server binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", about = "CRUD HTTP service for todo items backed by ScyllaDB")]
pub struct ServerConfig {
    #[arg(long, env = "TODO_HOST", default_value = "0.0.0.0")]
    pub host: String,
    #[arg(long, env = "PORT", default_value = "8080")]
    pub port: u16,
    /// Contact points, comma separated.
    #[arg(
        long,
        env = "SCYLLA_NODES",
        value_delimiter = ',',
        default_value = DEFAULT_NODE
    )]
    pub scylla_nodes: Vec<String>,
    #[arg(long, env = "SCYLLA_KEYSPACE", default_value = DEFAULT_KEYSPACE)]
    pub keyspace: String,
    /// Replication factor used when the keyspace has to be created.
    #[arg(long, env = "SCYLLA_REPLICATION_FACTOR", default_value = "1")]
    pub replication_factor: u32,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            known_nodes: self.scylla_nodes.clone(),
            keyspace: self.keyspace.clone(),
            replication_factor: self.replication_factor,
        }
    }
}
