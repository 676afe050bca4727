pub mod billing;
pub mod database_admin;
pub mod database_tools;
pub mod sample_data;
