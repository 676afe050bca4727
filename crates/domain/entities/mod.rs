pub mod active_user_records;
pub mod teams;
pub mod users;
