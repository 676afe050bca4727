use crates::domain::value_objects::restore::DatabaseLocation;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct BillingConfig {
    pub chargebee: Chargebee,
}

#[derive(Clone)]
pub struct Chargebee {
    pub api_key: String,
    pub site: String,
    /// Overrides `https://<site>.chargebee.com`, e.g. for a local stub.
    pub base_url: Option<String>,
}

impl std::fmt::Debug for Chargebee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chargebee")
            .field("api_key", &"***")
            .field("site", &self.site)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SampleDataConfig {
    pub database: Database,
}

#[derive(Clone)]
pub struct Database {
    pub url: String,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("url", &"***").finish()
    }
}

#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Directory holding `<environment>.conf` files.
    pub conf_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RestoreConfig {
    pub source: DatabaseLocation,
    pub target: DatabaseLocation,
    pub backup_dir: PathBuf,
}
