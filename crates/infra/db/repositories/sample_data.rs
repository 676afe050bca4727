use anyhow::Result;
use async_trait::async_trait;
use diesel::{Connection, RunQueryDsl, insert_into};
use std::sync::Arc;
use tracing::debug;

use crate::domain;
use crate::infra::db::postgres::{
    postgres_connection::PgPoolSquad,
    schema::{active_user_records, teams, users},
};
use domain::{
    entities::{
        active_user_records::InsertActiveUserRecordEntity, teams::InsertTeamEntity,
        users::InsertUserEntity,
    },
    repositories::sample_data::SampleDataRepository,
};

pub struct SampleDataPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SampleDataPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SampleDataRepository for SampleDataPostgres {
    async fn insert_team(&self, team: InsertTeamEntity) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(teams::table).values(&team).execute(&mut conn)?;
        debug!(team_id = %team.id, "sample_data: team committed");

        Ok(())
    }

    async fn insert_users(&self, new_users: Vec<InsertUserEntity>) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // One statement per row, committed together.
        let inserted = conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            let mut inserted = 0;
            for user in &new_users {
                inserted += insert_into(users::table).values(user).execute(conn)?;
            }
            Ok(inserted)
        })?;
        debug!(inserted, "sample_data: users committed");

        Ok(inserted)
    }

    async fn insert_active_user_records(
        &self,
        records: Vec<InsertActiveUserRecordEntity>,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let inserted = conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            let mut inserted = 0;
            for record in &records {
                inserted += insert_into(active_user_records::table)
                    .values(record)
                    .execute(conn)?;
            }
            Ok(inserted)
        })?;
        debug!(inserted, "sample_data: active user records committed");

        Ok(inserted)
    }
}
