use anyhow::{Context, Result};
use crates::domain::{
    repositories::billing::BillingProvider,
    value_objects::plans::{PlanDescriptor, ProviderPlan},
};
use std::sync::Arc;
use tracing::info;

/// Creates each plan at the billing provider, in order. Stops at the first
/// provider error; plans created before it stay created.
pub struct SeedPlansUseCase {
    billing: Arc<dyn BillingProvider + Send + Sync>,
}

impl SeedPlansUseCase {
    pub fn new(billing: Arc<dyn BillingProvider + Send + Sync>) -> Self {
        Self { billing }
    }

    pub async fn run(&self, plans: &[PlanDescriptor]) -> Result<Vec<ProviderPlan>> {
        let mut created = Vec::with_capacity(plans.len());

        for plan in plans {
            let provider_plan = self
                .billing
                .create_plan(plan)
                .await
                .with_context(|| format!("failed to create plan {}", plan.id))?;

            println!("{}", serde_json::to_string_pretty(&provider_plan)?);
            created.push(provider_plan);
        }

        info!(created = created.len(), "seed_plans: completed");
        Ok(created)
    }
}
