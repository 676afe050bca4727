pub mod bootstrap_database;
pub mod restore_database;
pub mod sample_data;
pub mod seed_plans;
