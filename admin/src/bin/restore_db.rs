use admin::{
    config::config_loader,
    usecases::restore_database::{RestoreDatabaseUseCase, RestoreOutcome, StdinConfirmation},
};
use anyhow::Result;
use crates::infra::pg_tools::PgCliTools;
use std::sync::Arc;
use tracing::{error, info};

const USAGE: &str = "Usage: SRC_DB_PWD=<production db password> TARGET_DB_PWD=<local db password> restore_db\n\
Assumes an SSH tunnel to the production database on SRC_DB_HOST:SRC_DB_PORT (default localhost:5555).";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("restore_db exited with error: {:#}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    crates::observability::init_observability("restore_db")?;

    let config = match config_loader::load_restore() {
        Ok(config) => config,
        Err(err) => {
            println!("\n{USAGE}\n");
            return Err(err);
        }
    };
    info!(
        source = %format!("{}:{}/{}", config.source.host, config.source.port, config.source.name),
        target = %format!("{}:{}/{}", config.target.host, config.target.port, config.target.name),
        "ENV has been loaded"
    );

    let usecase = RestoreDatabaseUseCase::new(Arc::new(PgCliTools), Arc::new(StdinConfirmation));
    match usecase.run(&config).await? {
        RestoreOutcome::Restored { .. } => info!("restore_db: done"),
        RestoreOutcome::Aborted { .. } => std::process::exit(1),
    }

    Ok(())
}
