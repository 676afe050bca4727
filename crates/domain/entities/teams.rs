use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::teams;

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = teams)]
pub struct InsertTeamEntity {
    pub id: String,
    pub name: String,
    pub timezone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub organization_id: Option<String>,
}
