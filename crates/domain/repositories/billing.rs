use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::plans::{PlanDescriptor, ProviderPlan};

#[automock]
#[async_trait]
pub trait BillingProvider {
    async fn create_plan(&self, plan: &PlanDescriptor) -> Result<ProviderPlan>;
}
