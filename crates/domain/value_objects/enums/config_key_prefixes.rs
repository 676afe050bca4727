use std::fmt::Display;

/// Where the bootstrapper looks for the default database settings inside an
/// environment config file. The two layouts are not interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKeyPrefix {
    /// `db.default.*`
    Play,
    /// `slick.dbs.default.*`
    Slick,
}

impl ConfigKeyPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKeyPrefix::Play => "db.default",
            ConfigKeyPrefix::Slick => "slick.dbs.default",
        }
    }

    pub fn key(&self, field: &str) -> String {
        format!("{}.{}", self.as_str(), field)
    }
}

impl Display for ConfigKeyPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_prefix_builds_db_default_keys() {
        assert_eq!(ConfigKeyPrefix::Play.key("host"), "db.default.host");
    }

    #[test]
    fn slick_prefix_builds_slick_dbs_keys() {
        assert_eq!(
            ConfigKeyPrefix::Slick.key("password"),
            "slick.dbs.default.password"
        );
    }
}
