/// Connection parameters for a database server, as read from an environment config file.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub username: String,
    pub password: String,
}

impl DatabaseSettings {
    /// libpq keyword/value string for the server's maintenance database, used
    /// for server-level statements such as `CREATE DATABASE`.
    pub fn maintenance_connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname=postgres",
            libpq_value(&self.host),
            self.port,
            libpq_value(&self.username),
            libpq_value(&self.password),
        )
    }
}

// Keep the password out of logs.
impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

fn libpq_value(raw: &str) -> String {
    let escaped = raw.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}
