use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::domain::value_objects::database_settings::DatabaseSettings;

#[derive(Debug, Error)]
pub enum DatabaseAdminError {
    #[error("database {0} already exists")]
    AlreadyExists(String),
    #[error(transparent)]
    Query(#[from] anyhow::Error),
}

/// Server-level statements run over an autocommit connection.
#[automock]
#[async_trait]
pub trait DatabaseAdmin {
    async fn create_database(&self, name: &str) -> Result<(), DatabaseAdminError>;
    async fn grant_all_privileges(&self, database: &str, user: &str)
    -> Result<(), DatabaseAdminError>;
}

#[automock]
#[async_trait]
pub trait DatabaseAdminConnector {
    async fn connect(
        &self,
        settings: &DatabaseSettings,
    ) -> anyhow::Result<Box<dyn DatabaseAdmin + Send + Sync>>;
}
