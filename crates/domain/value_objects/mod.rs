pub mod database_settings;
pub mod enums;
pub mod environments;
pub mod identifiers;
pub mod plans;
pub mod restore;
pub mod team_profiles;
