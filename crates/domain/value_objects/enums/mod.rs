pub mod config_key_prefixes;
pub mod period_units;
