use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use std::path::Path;

use crate::domain::value_objects::restore::DatabaseLocation;

/// The PostgreSQL client programs used to copy one database over another.
#[automock]
#[async_trait]
pub trait DatabaseTools {
    async fn dump(&self, source: &DatabaseLocation, file: &Path) -> Result<()>;
    async fn show_activity(&self, target: &DatabaseLocation) -> Result<()>;
    async fn drop_database(&self, target: &DatabaseLocation) -> Result<()>;
    async fn create_database(&self, target: &DatabaseLocation) -> Result<()>;
    async fn restore(&self, target: &DatabaseLocation, file: &Path) -> Result<()>;
    /// Printable drop/create/restore command lines, without passwords.
    fn describe_replace(&self, target: &DatabaseLocation, file: &Path) -> Vec<String>;
}
