use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

pub const BACKUP_FILE_SUFFIX: &str = "_backup.postgres";

/// Where a database lives and how to log into it.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseLocation {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for DatabaseLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseLocation")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Backup file named after the minute it was taken, e.g. `202410181530_backup.postgres`.
pub fn backup_file_path(backup_dir: &Path, taken_at: DateTime<Local>) -> PathBuf {
    backup_dir.join(format!(
        "{}{}",
        taken_at.format("%Y%m%d%H%M"),
        BACKUP_FILE_SUFFIX
    ))
}

pub fn is_backup_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(BACKUP_FILE_SUFFIX))
}
