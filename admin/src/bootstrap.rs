use crates::{
    domain::value_objects::{
        enums::config_key_prefixes::ConfigKeyPrefix, environments::Environment,
    },
    infra::db::repositories::database_admin::PostgresAdminConnector,
};
use std::ffi::OsString;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::config_loader;
use crate::usecases::bootstrap_database::{BootstrapDatabaseUseCase, BootstrapOutcome};

/// Shared entry point of the `create_database*` binaries. Always returns
/// normally: failures are logged and the process exits with status 0.
pub async fn run(prefix: ConfigKeyPrefix, component: &str) {
    dotenvy::dotenv().ok();
    if let Err(err) = crates::observability::init_observability(component) {
        eprintln!("{component}: logging unavailable: {err}");
    }

    let environment = environment_from_args(std::env::args_os());
    let config = config_loader::load_bootstrap();
    info!(
        environment = %environment,
        conf_dir = %config.conf_dir.display(),
        "ENV has been loaded"
    );

    let usecase =
        BootstrapDatabaseUseCase::new(Arc::new(PostgresAdminConnector), prefix, config.conf_dir);

    match usecase.run(&environment).await {
        BootstrapOutcome::Created => info!("{component}: done"),
        BootstrapOutcome::AlreadyExisted => info!("{component}: done (database already existed)"),
        BootstrapOutcome::Failed(err) => error!("{component}: finished with error: {err}"),
    }
}

/// First positional argument as the environment. Non UTF-8 bytes are replaced.
fn environment_from_args(args: impl IntoIterator<Item = OsString>) -> Environment {
    let argument = args
        .into_iter()
        .nth(1)
        .map(|arg| arg.to_string_lossy().into_owned());
    Environment::from_arg(argument.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<OsString> {
        values.iter().map(OsString::from).collect()
    }

    #[test]
    fn no_argument_selects_development() {
        assert_eq!(environment_from_args(args(&["create_database"])), Environment::default());
    }

    #[test]
    fn first_argument_names_the_environment() {
        let environment = environment_from_args(args(&["create_database", "staging", "extra"]));

        assert_eq!(environment.to_string(), "staging");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_argument_does_not_panic() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(vec![b's', b't', 0xff, b'g']);
        let environment =
            environment_from_args(vec![OsString::from("create_database"), raw]);

        assert_eq!(environment.to_string(), "st\u{fffd}g");
    }
}
