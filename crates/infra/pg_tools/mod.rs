use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::{error, info};

use crate::domain::{
    repositories::database_tools::DatabaseTools, value_objects::restore::DatabaseLocation,
};

const ACTIVITY_QUERY: &str =
    "SELECT datname,usename,client_addr,wait_event,query_start FROM pg_stat_activity ORDER BY query_start;";

/// One invocation of a PostgreSQL client program. The password travels in
/// `PGPASSWORD`, never in the arguments.
#[derive(Clone, PartialEq, Eq)]
pub struct PgCommand {
    pub program: &'static str,
    pub args: Vec<String>,
    password: String,
}

impl PgCommand {
    fn new(program: &'static str, location: &DatabaseLocation) -> Self {
        Self {
            program,
            args: vec![
                "--host".to_string(),
                location.host.clone(),
                "--port".to_string(),
                location.port.to_string(),
                "--username".to_string(),
                location.user.clone(),
                "--no-password".to_string(),
            ],
            password: location.password.clone(),
        }
    }

    fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Shell-like rendering for the operator, password omitted.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.to_string()];
        parts.extend(self.args.iter().map(|arg| shell_quote(arg)));
        parts.join(" ")
    }

    async fn run(&self) -> Result<()> {
        info!(command = %self.display(), "pg_tools: running");

        let status = Command::new(self.program)
            .args(&self.args)
            .env("PGPASSWORD", &self.password)
            .status()
            .await
            .with_context(|| format!("failed to start {}", self.program))?;

        if !status.success() {
            error!(program = self.program, status = %status, "pg_tools: command failed");
            anyhow::bail!("{} exited with {}", self.program, status);
        }
        Ok(())
    }
}

impl std::fmt::Debug for PgCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

pub fn dump_command(source: &DatabaseLocation, file: &Path) -> PgCommand {
    PgCommand::new("pg_dump", source)
        .arg("--format")
        .arg("custom")
        .arg("--blobs")
        .arg("--file")
        .arg(file.display().to_string())
        .arg(source.name.clone())
}

pub fn activity_command(target: &DatabaseLocation) -> PgCommand {
    PgCommand::new("psql", target)
        .arg("--dbname")
        .arg("postgres")
        .arg("--command")
        .arg(ACTIVITY_QUERY)
}

pub fn drop_command(target: &DatabaseLocation) -> PgCommand {
    PgCommand::new("dropdb", target).arg(target.name.clone())
}

pub fn create_command(target: &DatabaseLocation) -> PgCommand {
    PgCommand::new("createdb", target)
        .arg(format!("--owner={}", target.user))
        .arg(target.name.clone())
}

pub fn restore_command(target: &DatabaseLocation, file: &Path) -> PgCommand {
    PgCommand::new("pg_restore", target)
        .arg(format!("--dbname={}", target.name))
        .arg("--no-owner")
        .arg("--verbose")
        .arg(file.display().to_string())
}

fn shell_quote(arg: &str) -> String {
    if !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_=./:,@".contains(c))
    {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// Runs the real `pg_dump`/`dropdb`/`createdb`/`pg_restore`/`psql` binaries from `PATH`.
pub struct PgCliTools;

#[async_trait]
impl DatabaseTools for PgCliTools {
    async fn dump(&self, source: &DatabaseLocation, file: &Path) -> Result<()> {
        dump_command(source, file).run().await
    }

    async fn show_activity(&self, target: &DatabaseLocation) -> Result<()> {
        activity_command(target).run().await
    }

    async fn drop_database(&self, target: &DatabaseLocation) -> Result<()> {
        drop_command(target).run().await
    }

    async fn create_database(&self, target: &DatabaseLocation) -> Result<()> {
        create_command(target).run().await
    }

    async fn restore(&self, target: &DatabaseLocation, file: &Path) -> Result<()> {
        restore_command(target, file).run().await
    }

    fn describe_replace(&self, target: &DatabaseLocation, file: &Path) -> Vec<String> {
        vec![
            drop_command(target).display(),
            create_command(target).display(),
            restore_command(target, file).display(),
        ]
    }
}
