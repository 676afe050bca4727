use crates::{
    domain::{
        repositories::database_admin::{DatabaseAdminConnector, DatabaseAdminError},
        value_objects::{
            enums::config_key_prefixes::ConfigKeyPrefix, environments::Environment,
        },
    },
    infra::config_file::{ConfigDocument, ConfigFileError},
};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to load database settings: {0}")]
    Config(#[from] ConfigFileError),
    #[error("failed to connect to database server: {0:#}")]
    Connection(anyhow::Error),
    #[error("database statement failed: {0:#}")]
    Query(anyhow::Error),
}

#[derive(Debug)]
pub enum BootstrapOutcome {
    Created,
    /// The database was already there; privileges were granted anyway.
    AlreadyExisted,
    Failed(BootstrapError),
}

/// Creates the environment's database and grants its user full privileges.
/// Never fails: every error is logged and reported through the outcome.
pub struct BootstrapDatabaseUseCase {
    connector: Arc<dyn DatabaseAdminConnector + Send + Sync>,
    prefix: ConfigKeyPrefix,
    conf_dir: PathBuf,
}

impl BootstrapDatabaseUseCase {
    pub fn new(
        connector: Arc<dyn DatabaseAdminConnector + Send + Sync>,
        prefix: ConfigKeyPrefix,
        conf_dir: PathBuf,
    ) -> Self {
        Self {
            connector,
            prefix,
            conf_dir,
        }
    }

    pub async fn run(&self, environment: &Environment) -> BootstrapOutcome {
        match self.try_run(environment).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(
                    environment = %environment,
                    prefix = %self.prefix,
                    error = %err,
                    "bootstrap_database: failed"
                );
                BootstrapOutcome::Failed(err)
            }
        }
    }

    async fn try_run(&self, environment: &Environment) -> Result<BootstrapOutcome, BootstrapError> {
        let path = environment.config_path(&self.conf_dir);
        let settings = ConfigDocument::load(&path)?.database_settings(self.prefix)?;
        info!(
            environment = %environment,
            config = %path.display(),
            prefix = %self.prefix,
            host = %settings.host,
            port = settings.port,
            database = %settings.name,
            "bootstrap_database: settings loaded"
        );

        // Dropped at the end of this scope on every path, closing the connection.
        let admin = self
            .connector
            .connect(&settings)
            .await
            .map_err(BootstrapError::Connection)?;

        let outcome = match admin.create_database(&settings.name).await {
            Ok(()) => {
                info!(database = %settings.name, "bootstrap_database: database created");
                BootstrapOutcome::Created
            }
            Err(DatabaseAdminError::AlreadyExists(name)) => {
                warn!(database = %name, "bootstrap_database: database already exists");
                BootstrapOutcome::AlreadyExisted
            }
            Err(DatabaseAdminError::Query(err)) => return Err(BootstrapError::Query(err)),
        };

        admin
            .grant_all_privileges(&settings.name, &settings.username)
            .await
            .map_err(|err| BootstrapError::Query(anyhow::Error::new(err)))?;
        info!(
            database = %settings.name,
            user = %settings.username,
            "bootstrap_database: privileges granted"
        );

        Ok(outcome)
    }
}
