use crates::domain::value_objects::enums::config_key_prefixes::ConfigKeyPrefix;

/// Reads `db.default.*` from `conf/<environment>.conf`.
#[tokio::main]
async fn main() {
    admin::bootstrap::run(ConfigKeyPrefix::Play, "create_database").await;
}
