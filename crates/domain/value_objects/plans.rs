use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::period_units::PeriodUnit;

/// A billing plan to be created at the provider. Prices are in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanDescriptor {
    pub id: String,
    pub name: String,
    pub invoice_name: String,
    pub description: Option<String>,
    pub price: i64,
    pub currency_code: String,
    pub period: Option<i32>,
    pub period_unit: Option<PeriodUnit>,
}

impl PlanDescriptor {
    fn new(id: &str, name: &str, invoice_name: &str, price: i64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            invoice_name: invoice_name.to_string(),
            description: None,
            price,
            currency_code: "USD".to_string(),
            period: None,
            period_unit: None,
        }
    }

    fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    fn yearly(mut self) -> Self {
        self.period = Some(1);
        self.period_unit = Some(PeriodUnit::Year);
        self
    }

    /// Form parameters for the provider's create-plan call. Absent optionals are omitted.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("id", self.id.clone()),
            ("name", self.name.clone()),
            ("invoice_name", self.invoice_name.clone()),
            ("price", self.price.to_string()),
            ("currency_code", self.currency_code.clone()),
        ];

        if let Some(description) = &self.description {
            fields.push(("description", description.clone()));
        }
        if let Some(period) = self.period {
            fields.push(("period", period.to_string()));
        }
        if let Some(period_unit) = self.period_unit {
            fields.push(("period_unit", period_unit.to_string()));
        }

        fields
    }
}

/// The plans offered to customers, in submission order.
pub fn plan_catalog() -> Vec<PlanDescriptor> {
    vec![
        PlanDescriptor::new("developer-free-v1", "Developer", "Developer Free Plan", 0),
        PlanDescriptor::new("starter-v1", "Starter", "Stater Plan v1", 0).with_description(
            "The best plan for small organizations. $5/month/active user.",
        ),
        PlanDescriptor::new("business-v1", "Business", "Business Plan v1", 0).with_description(
            "The best plan for organizations with 50+ people. $8/month/active user.",
        ),
        PlanDescriptor::new("enterprise-v1", "Enterprise", "Enterprise Plan v1", 0)
            .with_description("The best plan for Enterprise that need the maximum value."),
        PlanDescriptor::new(
            "expert-package-1-v1",
            "Expert Package - 1 Skill",
            "Expert Package - 1 Skill",
            5000,
        )
        .with_description("One custom Skill with support for 12 months.")
        .yearly(),
        PlanDescriptor::new(
            "expert-package-3-v1",
            "Expert Package - 3 Skills",
            "Expert Package - 3 Skills",
            12000,
        )
        .with_description("3 custom Skill with support for 12 months.")
        .yearly(),
        PlanDescriptor::new(
            "expert-package-enterprise-v1",
            "Expert Package - Enterprise",
            "Expert Package - Enterprise",
            50000,
        )
        .with_description("The ultimate package for custom Skills")
        .yearly(),
    ]
}

/// Plan as returned by the billing provider. Unknown fields are kept so the
/// printed representation matches what the provider sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderPlan {
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub period: Option<i32>,
    #[serde(default)]
    pub period_unit: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
