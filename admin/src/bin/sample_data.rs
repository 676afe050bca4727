use admin::{config::config_loader, usecases::sample_data::GenerateSampleDataUseCase};
use anyhow::Result;
use crates::{
    domain::value_objects::team_profiles::sample_team_profiles,
    infra::db::{
        postgres::postgres_connection, repositories::sample_data::SampleDataPostgres,
    },
};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("sample_data exited with error: {:#}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    crates::observability::init_observability("sample_data")?;

    let config = config_loader::load_sample_data()?;
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&config.database.url)?;
    info!("Postgres connection has been established");

    let repository = Arc::new(SampleDataPostgres::new(Arc::new(postgres_pool)));
    let reports = GenerateSampleDataUseCase::new(repository)
        .run(&sample_team_profiles())
        .await?;

    info!(teams = reports.len(), "sample_data: completed");
    Ok(())
}
