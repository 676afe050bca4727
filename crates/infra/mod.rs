pub mod config_file;
pub mod db;
pub mod pg_tools;
