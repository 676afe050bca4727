use anyhow::{Result, anyhow};
use async_trait::async_trait;
use diesel::{
    PgConnection, QueryableByName, RunQueryDsl, result::Error as DieselError, sql_types::Bool,
    sql_types::Text,
};
use std::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::domain::{
    repositories::database_admin::{DatabaseAdmin, DatabaseAdminConnector, DatabaseAdminError},
    value_objects::database_settings::DatabaseSettings,
};
use crate::infra::db::postgres::postgres_connection::establish_autocommit_connection;

const DATABASE_EXISTS_QUERY: &str =
    "SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1) AS present";

#[derive(QueryableByName)]
struct DatabasePresence {
    #[diesel(sql_type = Bool)]
    present: bool,
}

pub struct DatabaseAdminPostgres {
    conn: Mutex<PgConnection>,
}

impl DatabaseAdminPostgres {
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn connection(&self) -> MutexGuard<'_, PgConnection> {
        match self.conn.lock() {
            Ok(conn) => conn,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn execute(&self, statement: &str) -> std::result::Result<(), DieselError> {
        diesel::sql_query(statement).execute(&mut *self.connection())?;
        Ok(())
    }

    fn database_exists(&self, name: &str) -> std::result::Result<bool, DieselError> {
        let row = diesel::sql_query(DATABASE_EXISTS_QUERY)
            .bind::<Text, _>(name)
            .get_result::<DatabasePresence>(&mut *self.connection())?;
        Ok(row.present)
    }
}

impl Drop for DatabaseAdminPostgres {
    fn drop(&mut self) {
        info!("database_admin: connection closed");
    }
}

#[async_trait]
impl DatabaseAdmin for DatabaseAdminPostgres {
    async fn create_database(&self, name: &str) -> Result<(), DatabaseAdminError> {
        let exists = self
            .database_exists(name)
            .map_err(|err| classify_error(err, name, "look up database"))?;
        if exists {
            return Err(DatabaseAdminError::AlreadyExists(name.to_string()));
        }

        let statement = format!("CREATE DATABASE {}", quote_identifier(name));
        self.execute(&statement)
            .map_err(|err| classify_error(err, name, "create database"))
    }

    async fn grant_all_privileges(
        &self,
        database: &str,
        user: &str,
    ) -> Result<(), DatabaseAdminError> {
        let statement = format!(
            "GRANT ALL PRIVILEGES ON DATABASE {} TO {}",
            quote_identifier(database),
            quote_identifier(user)
        );
        self.execute(&statement)
            .map_err(|err| classify_error(err, database, "grant privileges"))
    }
}

pub struct PostgresAdminConnector;

#[async_trait]
impl DatabaseAdminConnector for PostgresAdminConnector {
    async fn connect(
        &self,
        settings: &DatabaseSettings,
    ) -> Result<Box<dyn DatabaseAdmin + Send + Sync>> {
        let conn = establish_autocommit_connection(&settings.maintenance_connection_string())
            .map_err(|err| {
                anyhow!(
                    "failed to connect to {}:{} as {}: {}",
                    settings.host,
                    settings.port,
                    settings.username,
                    err
                )
            })?;
        info!(host = %settings.host, port = settings.port, "database_admin: connected");

        Ok(Box::new(DatabaseAdminPostgres::new(conn)))
    }
}

/// Double-quotes an SQL identifier, doubling embedded quotes.
pub fn quote_identifier(raw: &str) -> String {
    format!("\"{}\"", raw.replace('"', "\"\""))
}

// diesel does not surface SQLSTATE (42P04), so a database created between the
// catalog check and `CREATE DATABASE` is only recognised when the server
// reports errors in English (`lc_messages`).
fn classify_error(err: DieselError, database: &str, context: &str) -> DatabaseAdminError {
    match &err {
        DieselError::DatabaseError(_, info) if info.message().contains("already exists") => {
            DatabaseAdminError::AlreadyExists(database.to_string())
        }
        _ => DatabaseAdminError::Query(anyhow!("{context} failed for {database}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_double_quoted() {
        assert_eq!(quote_identifier("ellipsis"), "\"ellipsis\"");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[derive(Debug)]
    struct ServerMessage(&'static str);

    impl diesel::result::DatabaseErrorInformation for ServerMessage {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn server_error(message: &'static str) -> DieselError {
        DieselError::DatabaseError(
            diesel::result::DatabaseErrorKind::Unknown,
            Box::new(ServerMessage(message)),
        )
    }

    #[test]
    fn existence_check_reads_the_catalog_by_name() {
        assert!(DATABASE_EXISTS_QUERY.contains("FROM pg_database WHERE datname = $1"));
        assert!(DATABASE_EXISTS_QUERY.ends_with("AS present"));
    }

    #[test]
    fn english_duplicate_database_error_classifies_as_already_exists() {
        let err = classify_error(
            server_error("database \"ellipsis\" already exists"),
            "ellipsis",
            "create database",
        );

        assert!(matches!(err, DatabaseAdminError::AlreadyExists(name) if name == "ellipsis"));
    }

    #[test]
    fn non_database_errors_classify_as_query() {
        let err = classify_error(DieselError::NotFound, "ellipsis", "create database");

        assert!(matches!(err, DatabaseAdminError::Query(_)));
    }
}
