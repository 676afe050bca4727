use std::fmt::Display;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Older tooling called the development environment `dev`.
const LEGACY_DEVELOPMENT_ALIAS: &str = "dev";

/// Deployment environment whose `<name>.conf` file holds the database settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment(String);

impl Environment {
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg.map(str::trim).filter(|v| !v.is_empty()) {
            None | Some(LEGACY_DEVELOPMENT_ALIAS) => Self(DEFAULT_ENVIRONMENT.to_string()),
            Some(name) => Self(name.to_string()),
        }
    }

    pub fn config_path(&self, conf_dir: &Path) -> PathBuf {
        conf_dir.join(format!("{}.conf", self.0))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self(DEFAULT_ENVIRONMENT.to_string())
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_argument_selects_development() {
        assert_eq!(Environment::from_arg(None).to_string(), "development");
    }

    #[test]
    fn legacy_alias_normalizes_to_development() {
        assert_eq!(Environment::from_arg(Some("dev")), Environment::default());
    }

    #[test]
    fn other_names_pass_through() {
        let env = Environment::from_arg(Some("production"));

        assert_eq!(env.to_string(), "production");
        assert_eq!(
            env.config_path(Path::new("conf")),
            PathBuf::from("conf/production.conf")
        );
    }
}
