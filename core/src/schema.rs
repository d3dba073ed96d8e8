//! Session setup and idempotent provisioning of the todo keyspace and table.

use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use tracing::info;

use crate::error::RepositoryError;

pub const DEFAULT_NODE: &str = "127.0.0.1:9042";
pub const DEFAULT_KEYSPACE: &str = "todo_app";

/// Connection and provisioning settings for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub known_nodes: Vec<String>,
    pub keyspace: String,
    pub replication_factor: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            known_nodes: vec![DEFAULT_NODE.to_string()],
            keyspace: DEFAULT_KEYSPACE.to_string(),
            replication_factor: 1,
        }
    }
}

impl StoreConfig {
    /// Reject settings that cannot produce a working session. The keyspace
    /// name is interpolated into DDL, so it must be a plain CQL identifier.
    pub fn validate(&self) -> Result<(), RepositoryError> {
        if self.known_nodes.is_empty() {
            return Err(RepositoryError::Config("no known nodes".to_string()));
        }
        if self.replication_factor == 0 {
            return Err(RepositoryError::Config(
                "replication factor must be at least 1".to_string(),
            ));
        }
        let ks = self.keyspace.as_str();
        let valid = ks.len() <= 48
            && ks.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && ks.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(RepositoryError::Config(format!(
                "invalid keyspace name {ks:?}"
            )));
        }
        Ok(())
    }

    fn create_keyspace_cql(&self) -> String {
        format!(
            "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
            self.keyspace, self.replication_factor
        )
    }

    fn create_table_cql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {}.todos (\
             id uuid PRIMARY KEY, \
             user_id text, \
             title text, \
             description text, \
             status text, \
             created timestamp, \
             updated timestamp)",
            self.keyspace
        )
    }
}

/// Open a session, make sure the keyspace and table exist, and switch the
/// session to the keyspace.
pub async fn connect(config: &StoreConfig) -> Result<Session, RepositoryError> {
    config.validate()?;

    info!(nodes = ?config.known_nodes, "connecting to scylla");
    let session = SessionBuilder::new()
        .known_nodes(&config.known_nodes)
        .build()
        .await
        .map_err(RepositoryError::store)?;

    ensure_schema(&session, config).await?;

    session
        .use_keyspace(config.keyspace.as_str(), false)
        .await
        .map_err(RepositoryError::store)?;
    Ok(session)
}

/// Create the keyspace and `todos` table when absent. Safe to run on every
/// start.
pub async fn ensure_schema(session: &Session, config: &StoreConfig) -> Result<(), RepositoryError> {
    session
        .query_unpaged(config.create_keyspace_cql(), ())
        .await
        .map_err(RepositoryError::store)?;
    session
        .query_unpaged(config.create_table_cql(), ())
        .await
        .map_err(RepositoryError::store)?;
    info!(keyspace = %config.keyspace, "keyspace and todos table ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = StoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.keyspace, "todo_app");
        assert_eq!(config.known_nodes, vec!["127.0.0.1:9042".to_string()]);
    }

    #[test]
    fn rejects_unsafe_keyspace_names() {
        for name in ["", "1abc", "todo-app", "todo_app; DROP", "a".repeat(49).as_str()] {
            let config = StoreConfig {
                keyspace: name.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(RepositoryError::Config(_))),
                "{name:?}"
            );
        }
    }

    #[test]
    fn rejects_zero_replication_and_empty_nodes() {
        let config = StoreConfig {
            replication_factor: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = StoreConfig {
            known_nodes: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn ddl_is_idempotent_and_qualified() {
        let config = StoreConfig {
            keyspace: "todos_test".to_string(),
            replication_factor: 3,
            ..Default::default()
        };
        let keyspace = config.create_keyspace_cql();
        assert!(keyspace.starts_with("CREATE KEYSPACE IF NOT EXISTS todos_test "));
        assert!(keyspace.contains("'replication_factor': 3}"));

        let table = config.create_table_cql();
        assert!(table.starts_with("CREATE TABLE IF NOT EXISTS todos_test.todos ("));
        assert!(table.contains("id uuid PRIMARY KEY"));
        assert!(table.contains("created timestamp"));
    }
}
