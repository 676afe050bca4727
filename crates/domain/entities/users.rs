use diesel::prelude::*;

use crate::infra::db::postgres::schema::users;

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = users)]
pub struct InsertUserEntity {
    pub id: String,
    pub team_id: String,
    pub email: Option<String>,
}
