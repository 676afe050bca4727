use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::{
    active_user_records::InsertActiveUserRecordEntity, teams::InsertTeamEntity,
    users::InsertUserEntity,
};

/// Each call is committed on its own; nothing spans calls.
#[automock]
#[async_trait]
pub trait SampleDataRepository {
    async fn insert_team(&self, team: InsertTeamEntity) -> Result<()>;
    async fn insert_users(&self, users: Vec<InsertUserEntity>) -> Result<usize>;
    async fn insert_active_user_records(
        &self,
        records: Vec<InsertActiveUserRecordEntity>,
    ) -> Result<usize>;
}
