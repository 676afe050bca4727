use crates::domain::value_objects::enums::config_key_prefixes::ConfigKeyPrefix;

/// Reads `slick.dbs.default.*` from `conf/<environment>.conf`.
#[tokio::main]
async fn main() {
    admin::bootstrap::run(ConfigKeyPrefix::Slick, "create_database_slick").await;
}
