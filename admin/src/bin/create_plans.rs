use admin::{config::config_loader, usecases::seed_plans::SeedPlansUseCase};
use anyhow::Result;
use crates::{
    domain::value_objects::plans::plan_catalog, payments::chargebee_client::ChargebeeClient,
};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("create_plans exited with error: {:#}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    crates::observability::init_observability("create_plans")?;

    let config = config_loader::load_billing()?;
    info!(site = %config.chargebee.site, "ENV has been loaded");

    let chargebee = &config.chargebee;
    let client = match &chargebee.base_url {
        Some(base_url) => ChargebeeClient::with_base_url(chargebee.api_key.clone(), base_url)?,
        None => ChargebeeClient::new(chargebee.api_key.clone(), &chargebee.site)?,
    };

    SeedPlansUseCase::new(Arc::new(client))
        .run(&plan_catalog())
        .await?;

    Ok(())
}
