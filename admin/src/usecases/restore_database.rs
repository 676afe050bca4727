use anyhow::{Context, Result};
use chrono::Local;
use crates::domain::{
    repositories::database_tools::DatabaseTools,
    value_objects::restore::{backup_file_path, is_backup_file},
};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::config_model::RestoreConfig;

pub const CONFIRMATION_PROMPT: &str = "Are you sure? (yes/no)";

#[cfg_attr(test, mockall::automock)]
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Asks on stdout and reads one line from stdin; only `yes` confirms.
pub struct StdinConfirmation;

impl Confirmation for StdinConfirmation {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let mut stdout = std::io::stdout();
        writeln!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim() == "yes")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored {
        backup: PathBuf,
        removed_backups: usize,
    },
    Aborted {
        backup: PathBuf,
    },
}

/// Copies the source database over the target: dump, confirm, drop, create, restore, clean up.
pub struct RestoreDatabaseUseCase {
    tools: Arc<dyn DatabaseTools + Send + Sync>,
    confirmation: Arc<dyn Confirmation + Send + Sync>,
}

impl RestoreDatabaseUseCase {
    pub fn new(
        tools: Arc<dyn DatabaseTools + Send + Sync>,
        confirmation: Arc<dyn Confirmation + Send + Sync>,
    ) -> Self {
        Self {
            tools,
            confirmation,
        }
    }

    pub async fn run(&self, config: &RestoreConfig) -> Result<RestoreOutcome> {
        let backup = backup_file_path(&config.backup_dir, Local::now());

        info!(backup = %backup.display(), "restore_database: backing up");
        self.tools
            .dump(&config.source, &backup)
            .await
            .context("backup of the source database failed")?;

        let size = tokio::fs::metadata(&backup)
            .await
            .with_context(|| format!("backup file {} is missing", backup.display()))?
            .len();
        info!(backup = %backup.display(), bytes = size, "restore_database: backup finished");

        println!("Replacing {} with:", config.target.name);
        for line in self.tools.describe_replace(&config.target, &backup) {
            println!("   {line}");
        }
        println!();

        if !self.confirmation.confirm(CONFIRMATION_PROMPT)? {
            println!("\n\nBye!\n\n");
            info!(backup = %backup.display(), "restore_database: aborted by operator");
            return Ok(RestoreOutcome::Aborted { backup });
        }

        if let Err(err) = self.tools.show_activity(&config.target).await {
            warn!(error = %err, "restore_database: could not list connections");
        }
        // The target may not exist yet.
        if let Err(err) = self.tools.drop_database(&config.target).await {
            warn!(error = %err, "restore_database: drop failed; continuing");
        }
        self.tools
            .create_database(&config.target)
            .await
            .context("could not create the target database")?;
        // pg_restore reports errors for objects it cannot recreate; the data still lands.
        if let Err(err) = self.tools.restore(&config.target, &backup).await {
            warn!(error = %err, "restore_database: restore reported errors; ignored");
        }

        let removed_backups = remove_backups(&config.backup_dir).await?;
        info!(removed_backups, "restore_database: done");

        Ok(RestoreOutcome::Restored {
            backup,
            removed_backups,
        })
    }
}

async fn remove_backups(backup_dir: &Path) -> Result<usize> {
    let mut entries = tokio::fs::read_dir(backup_dir)
        .await
        .with_context(|| format!("cannot list {}", backup_dir.display()))?;

    let mut backups = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if is_backup_file(&path) {
            backups.push(path);
        }
    }
    info!(found = backups.len(), "restore_database: deleting backup files");

    for path in &backups {
        tokio::fs::remove_file(path)
            .await
            .with_context(|| format!("cannot delete {}", path.display()))?;
    }
    Ok(backups.len())
}
