pub mod database_admin;
pub mod sample_data;
