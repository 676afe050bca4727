use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::active_user_records;

/// Marks that a user did something billable inside the activity window.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = active_user_records)]
pub struct InsertActiveUserRecordEntity {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}
