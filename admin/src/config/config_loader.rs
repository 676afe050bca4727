use anyhow::{Context, Result};
use crates::domain::value_objects::restore::DatabaseLocation;
use std::path::PathBuf;
use thiserror::Error;

use super::config_model::{
    BillingConfig, BootstrapConfig, Chargebee, Database, RestoreConfig, SampleDataConfig,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(String),
    #[error("{key} is invalid: {value:?}")]
    Invalid { key: String, value: String },
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

pub fn load_billing() -> Result<BillingConfig> {
    dotenvy::dotenv().ok();
    load_billing_from(env_lookup)
}

pub fn load_sample_data() -> Result<SampleDataConfig> {
    dotenvy::dotenv().ok();
    load_sample_data_from(env_lookup)
}

pub fn load_bootstrap() -> BootstrapConfig {
    dotenvy::dotenv().ok();
    load_bootstrap_from(env_lookup)
}

pub fn load_restore() -> Result<RestoreConfig> {
    dotenvy::dotenv().ok();
    load_restore_from(env_lookup)
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::Missing(key.to_string()))
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn port(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u16) -> Result<u16, ConfigError> {
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

fn load_billing_from(lookup: impl Fn(&str) -> Option<String>) -> Result<BillingConfig> {
    let chargebee = Chargebee {
        api_key: required(&lookup, "CHARGEBEE_API_KEY")?,
        site: required(&lookup, "CHARGEBEE_SITE")?,
        base_url: lookup("CHARGEBEE_BASE_URL").filter(|v| !v.trim().is_empty()),
    };

    Ok(BillingConfig { chargebee })
}

fn load_sample_data_from(lookup: impl Fn(&str) -> Option<String>) -> Result<SampleDataConfig> {
    let database = Database {
        url: required(&lookup, "DATABASE_URL").context("sample data needs a database")?,
    };

    Ok(SampleDataConfig { database })
}

fn load_bootstrap_from(lookup: impl Fn(&str) -> Option<String>) -> BootstrapConfig {
    BootstrapConfig {
        conf_dir: PathBuf::from(optional(&lookup, "CONF_DIR", "conf")),
    }
}

fn load_restore_from(lookup: impl Fn(&str) -> Option<String>) -> Result<RestoreConfig> {
    // The source is normally reached through an SSH tunnel on a non-default port.
    let source = DatabaseLocation {
        host: optional(&lookup, "SRC_DB_HOST", "localhost"),
        port: port(&lookup, "SRC_DB_PORT", 5555)?,
        name: optional(&lookup, "SRC_DB_NAME", "ellipsis"),
        user: optional(&lookup, "SRC_DB_USER", "ellipsis"),
        password: required(&lookup, "SRC_DB_PWD")?,
    };

    let target = DatabaseLocation {
        host: optional(&lookup, "TARGET_DB_HOST", "localhost"),
        port: port(&lookup, "TARGET_DB_PORT", 5432)?,
        name: optional(&lookup, "TARGET_DB_NAME", "ellipsis"),
        user: optional(&lookup, "TARGET_DB_USER", "ellipsis"),
        password: required(&lookup, "TARGET_DB_PWD")?,
    };

    Ok(RestoreConfig {
        source,
        target,
        backup_dir: PathBuf::from(optional(&lookup, "BACKUP_DIR", "/tmp")),
    })
}
