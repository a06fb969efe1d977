use std::sync::Arc;

use dubsite_core::auth::{Authorizer, SharedSecretAuthorizer};
use dubsite_db::ConnectionFactory;
use dubsite_storage::{StorageBackend, StorageClient, StorageError};

use crate::config::ServerConfig;

/// Everything a handler needs, passed to each invocation.
///
/// Holds no per-request data and no open connections: the factory opens a
/// connection inside each invocation. Cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    /// Opens the per-invocation database connection.
    pub connections: ConnectionFactory,
    /// Gate for mutating requests.
    pub authorizer: Arc<dyn Authorizer>,
    /// Destination for uploaded files.
    pub storage: Arc<dyn StorageBackend>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire the production collaborators from configuration.
    pub fn from_config(
        config: ServerConfig,
        connections: ConnectionFactory,
    ) -> Result<Self, StorageError> {
        let authorizer = SharedSecretAuthorizer::new(config.admin.password.clone())
            .allow_empty_secret(config.admin.allow_empty_password);

        let storage = StorageClient::new(
            config.storage.upload_url.clone(),
            std::time::Duration::from_secs(config.storage.upload_timeout_secs),
        )?;

        Ok(Self {
            connections,
            authorizer: Arc::new(authorizer),
            storage: Arc::new(storage),
            config: Arc::new(config),
        })
    }
}
