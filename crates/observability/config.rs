use std::env;

#[derive(Clone)]
pub(crate) struct ServiceContext {
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) component: String,
}

#[derive(Clone)]
pub(crate) struct ObservabilityConfig {
    pub(crate) service_context: ServiceContext,
}

impl ObservabilityConfig {
    pub(crate) fn from_env(component: &str) -> Self {
        Self::from_lookup(component, |key| env::var(key).ok())
    }

    fn from_lookup(component: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let component = component.trim().to_string();

        let service_name = lookup("SERVICE_NAME")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| component.clone());

        let environment = lookup("STAGE")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            service_context: ServiceContext {
                service_name,
                environment,
                component,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_name_defaults_to_component() {
        let config = ObservabilityConfig::from_lookup(" create_plans ", |_| None);

        assert_eq!(config.service_context.service_name, "create_plans");
        assert_eq!(config.service_context.component, "create_plans");
        assert_eq!(config.service_context.environment, "unknown");
    }

    #[test]
    fn empty_values_fall_back() {
        let config = ObservabilityConfig::from_lookup("sample_data", |key| match key {
            "SERVICE_NAME" => Some(String::new()),
            "STAGE" => Some("local".to_string()),
            _ => None,
        });

        assert_eq!(config.service_context.service_name, "sample_data");
        assert_eq!(config.service_context.environment, "local");
    }
}
