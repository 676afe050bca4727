//! Reader for the HOCON-style `<environment>.conf` files the application is
//! deployed with. Only the subset those files use is supported: objects,
//! dotted keys, arrays, `+=`, `include "file"` and `${path}` / `${?ENV}`
//! substitutions. Values are kept as text and converted on lookup.
//!
//! Files are merged first and substitutions resolved afterwards, so `${path}`
//! sees the final value of `path` wherever it is assigned.

pub mod parser;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::domain::value_objects::{
    database_settings::DatabaseSettings, enums::config_key_prefixes::ConfigKeyPrefix,
};
use parser::{Node, Piece, RawValue};

const MAX_INCLUDE_DEPTH: usize = 8;

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config file {path}: {message}")]
    Parse { path: String, message: String },
    #[error("could not resolve substitution ${{{0}}}")]
    UnresolvedSubstitution(String),
    #[error("substitution ${{{0}}} refers back to itself")]
    SubstitutionCycle(String),
    #[error("missing required config key {0}")]
    MissingKey(String),
    #[error("config key {key} has invalid value {value:?}")]
    InvalidValue { key: String, value: String },
    #[error("config includes nested too deeply at {0}")]
    IncludeTooDeep(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Scalar(String),
    List(Vec<String>),
}

/// A config file flattened to dotted paths.
#[derive(Debug, Clone, Default)]
pub struct ConfigDocument {
    entries: BTreeMap<String, ConfigValue>,
}

impl ConfigDocument {
    /// Loads a file, resolving `${?ENV}` substitutions against the process environment.
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        Self::load_with_env(path, &|name| std::env::var(name).ok())
    }

    pub fn load_with_env(
        path: &Path,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigFileError> {
        let mut merger = Merger::default();
        merger.load_file(path, &[], 0)?;
        let entries = Resolver::new(&merger.entries, env).resolve_all()?;
        debug!(path = %path.display(), keys = entries.len(), "config_file: loaded");

        Ok(Self { entries })
    }

    pub fn parse_str_with_env(
        text: &str,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigFileError> {
        let nodes = parser::parse_document(text).map_err(|message| ConfigFileError::Parse {
            path: "<string>".to_string(),
            message,
        })?;
        let mut merger = Merger::default();
        merger.apply_nodes(&[], &nodes, None, 0)?;
        let entries = Resolver::new(&merger.entries, env).resolve_all()?;

        Ok(Self { entries })
    }

    pub fn get_string(&self, key: &str) -> Result<String, ConfigFileError> {
        match self.entries.get(key) {
            Some(ConfigValue::Scalar(value)) => Ok(value.clone()),
            Some(ConfigValue::List(items)) => Err(ConfigFileError::InvalidValue {
                key: key.to_string(),
                value: format!("{items:?}"),
            }),
            None => Err(ConfigFileError::MissingKey(key.to_string())),
        }
    }

    pub fn get_u16(&self, key: &str) -> Result<u16, ConfigFileError> {
        let raw = self.get_string(key)?;
        raw.trim()
            .parse()
            .map_err(|_| ConfigFileError::InvalidValue {
                key: key.to_string(),
                value: raw,
            })
    }

    /// Reads `host`, `port`, `name`, `username` and `password` under the given prefix.
    pub fn database_settings(
        &self,
        prefix: ConfigKeyPrefix,
    ) -> Result<DatabaseSettings, ConfigFileError> {
        Ok(DatabaseSettings {
            host: self.get_string(&prefix.key("host"))?,
            port: self.get_u16(&prefix.key("port"))?,
            name: self.get_string(&prefix.key("name"))?,
            username: self.get_string(&prefix.key("username"))?,
            password: self.get_string(&prefix.key("password"))?,
        })
    }
}

/// Unresolved assignments of one key, oldest first.
#[derive(Debug, Clone)]
enum RawEntry {
    Scalar(Vec<Vec<Piece>>),
    List(Vec<Vec<Piece>>),
}

#[derive(Default)]
struct Merger {
    entries: BTreeMap<String, RawEntry>,
}

impl Merger {
    fn load_file(
        &mut self,
        path: &Path,
        prefix: &[String],
        depth: usize,
    ) -> Result<(), ConfigFileError> {
        if depth > MAX_INCLUDE_DEPTH {
            return Err(ConfigFileError::IncludeTooDeep(path.display().to_string()));
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let nodes = parser::parse_document(&text).map_err(|message| ConfigFileError::Parse {
            path: path.display().to_string(),
            message,
        })?;

        self.apply_nodes(prefix, &nodes, path.parent(), depth)
    }

    fn apply_nodes(
        &mut self,
        prefix: &[String],
        nodes: &[Node],
        base_dir: Option<&Path>,
        depth: usize,
    ) -> Result<(), ConfigFileError> {
        for node in nodes {
            match node {
                Node::Include(name) => {
                    let included = base_dir
                        .map(|dir| dir.join(name))
                        .unwrap_or_else(|| PathBuf::from(name));
                    // Missing includes are skipped, as the application's loader does.
                    // Included keys land under the enclosing object.
                    if included.exists() {
                        self.load_file(&included, prefix, depth + 1)?;
                    } else {
                        debug!(path = %included.display(), "config_file: include not found, skipped");
                    }
                }
                Node::Field {
                    path,
                    value,
                    append,
                } => {
                    let mut full_path = prefix.to_vec();
                    full_path.extend(path.iter().cloned());
                    self.apply_value(&full_path, value, *append, base_dir, depth)?;
                }
            }
        }
        Ok(())
    }

    fn apply_value(
        &mut self,
        path: &[String],
        value: &RawValue,
        append: bool,
        base_dir: Option<&Path>,
        depth: usize,
    ) -> Result<(), ConfigFileError> {
        let key = path.join(".");

        match value {
            RawValue::Object(nodes) => {
                // An object replaces a scalar but merges with an existing object.
                self.entries.remove(&key);
                self.apply_nodes(path, nodes, base_dir, depth)
            }
            RawValue::Array(items) => {
                let items = items
                    .iter()
                    .filter_map(|item| match item {
                        RawValue::Pieces(pieces) => Some(pieces.clone()),
                        _ => None,
                    })
                    .collect();
                self.set_list(key, items, append);
                Ok(())
            }
            RawValue::Pieces(pieces) if append => {
                self.set_list(key, vec![pieces.clone()], true);
                Ok(())
            }
            RawValue::Pieces(pieces) => {
                self.clear_nested(&key);
                match self.entries.get_mut(&key) {
                    Some(RawEntry::Scalar(layers)) => layers.push(pieces.clone()),
                    _ => {
                        self.entries
                            .insert(key, RawEntry::Scalar(vec![pieces.clone()]));
                    }
                }
                Ok(())
            }
        }
    }

    fn set_list(&mut self, key: String, items: Vec<Vec<Piece>>, append: bool) {
        self.clear_nested(&key);
        if append {
            if let Some(RawEntry::List(existing)) = self.entries.get_mut(&key) {
                existing.extend(items);
                return;
            }
        }
        self.entries.insert(key, RawEntry::List(items));
    }

    fn clear_nested(&mut self, key: &str) {
        let nested = format!("{key}.");
        self.entries.retain(|existing, _| !existing.starts_with(&nested));
    }
}

/// Resolves merged assignments. A scalar takes its latest assignment that
/// yields a value; an unset `${?X}` falls back to the assignment before it.
struct Resolver<'a> {
    raw: &'a BTreeMap<String, RawEntry>,
    env: &'a dyn Fn(&str) -> Option<String>,
    in_progress: Vec<String>,
}

impl<'a> Resolver<'a> {
    fn new(raw: &'a BTreeMap<String, RawEntry>, env: &'a dyn Fn(&str) -> Option<String>) -> Self {
        Self {
            raw,
            env,
            in_progress: Vec::new(),
        }
    }

    fn resolve_all(mut self) -> Result<BTreeMap<String, ConfigValue>, ConfigFileError> {
        let mut entries = BTreeMap::new();

        for (key, entry) in self.raw {
            match entry {
                RawEntry::Scalar(layers) => {
                    if let Some(text) = self.resolve_key(key, layers.len())? {
                        entries.insert(key.clone(), ConfigValue::Scalar(text));
                    }
                }
                RawEntry::List(items) => {
                    let mut resolved = Vec::with_capacity(items.len());
                    for item in items {
                        if let Some(text) = self.resolve_pieces(item, key, 0)? {
                            resolved.push(text);
                        }
                    }
                    entries.insert(key.clone(), ConfigValue::List(resolved));
                }
            }
        }

        Ok(entries)
    }

    /// Value of a scalar key using only its first `upto` assignments.
    fn resolve_key(&mut self, key: &str, upto: usize) -> Result<Option<String>, ConfigFileError> {
        let raw = self.raw;
        let Some(RawEntry::Scalar(layers)) = raw.get(key) else {
            return Ok(None);
        };

        self.in_progress.push(key.to_string());
        let mut result = Ok(None);
        for idx in (0..upto.min(layers.len())).rev() {
            match self.resolve_pieces(&layers[idx], key, idx) {
                Ok(None) => continue,
                other => {
                    result = other;
                    break;
                }
            }
        }
        self.in_progress.pop();

        result
    }

    fn resolve_pieces(
        &mut self,
        pieces: &[Piece],
        owner: &str,
        layer: usize,
    ) -> Result<Option<String>, ConfigFileError> {
        let mut text = String::new();
        let mut resolved_any = false;

        for piece in pieces {
            match piece {
                Piece::Quoted(part) | Piece::Unquoted(part) => {
                    text.push_str(part);
                    resolved_any = true;
                }
                Piece::Substitution { path, optional } => {
                    match self.lookup(path, owner, layer)? {
                        Some(found) => {
                            text.push_str(&found);
                            resolved_any = true;
                        }
                        None if *optional => {}
                        None => return Err(ConfigFileError::UnresolvedSubstitution(path.clone())),
                    }
                }
            }
        }

        Ok(resolved_any.then_some(text))
    }

    // Config paths win over environment variables of the same name.
    fn lookup(
        &mut self,
        path: &str,
        owner: &str,
        layer: usize,
    ) -> Result<Option<String>, ConfigFileError> {
        let found = if path == owner {
            // A key referring to itself sees the assignments before this one.
            self.resolve_key(path, layer)?
        } else if self.in_progress.iter().any(|key| key == path) {
            return Err(ConfigFileError::SubstitutionCycle(path.to_string()));
        } else {
            self.resolve_key(path, usize::MAX)?
        };

        Ok(found.or_else(|| (self.env)(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn parse(text: &str) -> ConfigDocument {
        ConfigDocument::parse_str_with_env(text, &no_env).unwrap()
    }

    impl ConfigDocument {
        fn contains(&self, key: &str) -> bool {
            self.entries.contains_key(key)
        }

        fn get(&self, key: &str) -> Option<&ConfigValue> {
            self.entries.get(key)
        }
    }

    const PLAY_CONF: &str = r#"
db.default {
  host = localhost
  port = 5432
  name = "ellipsis"
  username = ellipsis
  password = "ellipsis"
}
"#;

    const SLICK_CONF: &str = r#"
slick.dbs.default {
  host = db.internal
  port = 6543
  name = ellipsis_test
  username = tester
  password = secret
}
"#;

    #[test]
    fn play_prefix_reads_db_default_settings() {
        let settings = parse(PLAY_CONF)
            .database_settings(ConfigKeyPrefix::Play)
            .unwrap();

        assert_eq!(settings.host, "localhost");
        assert_eq!(settings.port, 5432);
        assert_eq!(settings.name, "ellipsis");
        assert_eq!(settings.username, "ellipsis");
        assert_eq!(settings.password, "ellipsis");
    }

    #[test]
    fn slick_prefix_reads_slick_dbs_settings() {
        let settings = parse(SLICK_CONF)
            .database_settings(ConfigKeyPrefix::Slick)
            .unwrap();

        assert_eq!(settings.host, "db.internal");
        assert_eq!(settings.port, 6543);
        assert_eq!(settings.username, "tester");
    }

    #[test]
    fn prefixes_are_not_interchangeable() {
        let err = parse(SLICK_CONF)
            .database_settings(ConfigKeyPrefix::Play)
            .unwrap_err();

        assert!(matches!(err, ConfigFileError::MissingKey(key) if key == "db.default.host"));
    }

    #[test]
    fn later_assignments_override_earlier_ones() {
        let doc = parse("db.default.host = first\ndb.default { host = second }\n");

        assert_eq!(doc.get_string("db.default.host").unwrap(), "second");
    }

    #[test]
    fn objects_merge_with_earlier_fields() {
        let doc = parse("db.default { host = h }\ndb.default { port = 1 }\n");

        assert_eq!(doc.get_string("db.default.host").unwrap(), "h");
        assert_eq!(doc.get_u16("db.default.port").unwrap(), 1);
    }

    #[test]
    fn scalar_replaces_nested_object() {
        let doc = parse("a { b = 1 }\na = 2\n");

        assert!(!doc.contains("a.b"));
        assert_eq!(doc.get_string("a").unwrap(), "2");
    }

    #[test]
    fn optional_env_substitution_overrides_when_set() {
        let env: HashMap<&str, &str> = HashMap::from([("DB_HOST", "db.example.com")]);
        let lookup = |name: &str| env.get(name).map(|v| v.to_string());
        let doc = ConfigDocument::parse_str_with_env(
            "db.default.host = localhost\ndb.default.host = ${?DB_HOST}\n",
            &lookup,
        )
        .unwrap();

        assert_eq!(doc.get_string("db.default.host").unwrap(), "db.example.com");
    }

    #[test]
    fn optional_env_substitution_keeps_previous_value_when_unset() {
        let doc = parse("db.default.host = localhost\ndb.default.host = ${?DB_HOST}\n");

        assert_eq!(doc.get_string("db.default.host").unwrap(), "localhost");
    }

    #[test]
    fn required_substitution_must_resolve() {
        let err = ConfigDocument::parse_str_with_env("a = ${MISSING}\n", &no_env).unwrap_err();

        assert!(matches!(err, ConfigFileError::UnresolvedSubstitution(path) if path == "MISSING"));
    }

    #[test]
    fn substitution_can_reference_earlier_path() {
        let doc = parse("base = ellipsis\ndb.default.name = ${base}\"_test\"\n");

        assert_eq!(doc.get_string("db.default.name").unwrap(), "ellipsis_test");
    }

    #[test]
    fn substitution_can_reference_later_path() {
        let doc = parse("a = ${b}\nb = 2\n");

        assert_eq!(doc.get_string("a").unwrap(), "2");
    }

    #[test]
    fn substitution_sees_final_value_of_overridden_path() {
        let doc = parse("b = 1\na = ${b}\nb = 2\n");

        assert_eq!(doc.get_string("a").unwrap(), "2");
    }

    #[test]
    fn substitution_follows_later_env_override() {
        let lookup = |name: &str| (name == "DB_HOST").then(|| "db.example.com".to_string());
        let doc = ConfigDocument::parse_str_with_env(
            "db.default.host = localhost\n\
             slick.dbs.default.host = ${db.default.host}\n\
             db.default.host = ${?DB_HOST}\n",
            &lookup,
        )
        .unwrap();

        assert_eq!(doc.get_string("slick.dbs.default.host").unwrap(), "db.example.com");
    }

    #[test]
    fn self_reference_extends_previous_value() {
        let doc = parse("name = ellipsis\nname = ${name}\"_test\"\n");

        assert_eq!(doc.get_string("name").unwrap(), "ellipsis_test");
    }

    #[test]
    fn substitution_cycle_is_reported() {
        let err = ConfigDocument::parse_str_with_env("a = ${b}\nb = ${a}\n", &no_env).unwrap_err();

        assert!(matches!(err, ConfigFileError::SubstitutionCycle(_)));
    }

    #[test]
    fn appends_extend_lists() {
        let doc = parse("modules = [\"a\", \"b\"]\nmodules += \"c\"\n");

        assert_eq!(
            doc.get("modules"),
            Some(&ConfigValue::List(vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string()
            ]))
        );
    }

    #[test]
    fn invalid_port_is_reported() {
        let doc = parse("db.default.port = fifty\n");

        assert!(matches!(
            doc.get_u16("db.default.port"),
            Err(ConfigFileError::InvalidValue { .. })
        ));
    }

    #[test]
    fn includes_are_resolved_relative_to_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut base = std::fs::File::create(dir.path().join("application.conf")).unwrap();
        writeln!(base, "db.default {{ host = localhost\nport = 5432 }}").unwrap();
        let mut env_file = std::fs::File::create(dir.path().join("development.conf")).unwrap();
        writeln!(
            env_file,
            "include \"application.conf\"\ninclude \"missing.conf\"\ndb.default.port = 5433"
        )
        .unwrap();

        let doc = ConfigDocument::load_with_env(&dir.path().join("development.conf"), &no_env)
            .unwrap();

        assert_eq!(doc.get_string("db.default.host").unwrap(), "localhost");
        assert_eq!(doc.get_u16("db.default.port").unwrap(), 5433);
    }

    #[test]
    fn include_inside_object_lands_under_that_object() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("db.conf"), "host = h\nport = 5432\n").unwrap();
        std::fs::write(
            dir.path().join("development.conf"),
            "db.default {\n  include \"db.conf\"\n}\n",
        )
        .unwrap();

        let doc = ConfigDocument::load_with_env(&dir.path().join("development.conf"), &no_env)
            .unwrap();

        assert_eq!(doc.get_string("db.default.host").unwrap(), "h");
        assert_eq!(doc.get_u16("db.default.port").unwrap(), 5432);
        assert!(!doc.contains("host"));
    }

    #[test]
    fn included_file_overrides_are_seen_by_earlier_substitutions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("local.conf"), "db.default.host = db.local\n").unwrap();
        std::fs::write(
            dir.path().join("development.conf"),
            "db.default.host = localhost\nslick.dbs.default.host = ${db.default.host}\ninclude \"local.conf\"\n",
        )
        .unwrap();

        let doc = ConfigDocument::load_with_env(&dir.path().join("development.conf"), &no_env)
            .unwrap();

        assert_eq!(doc.get_string("slick.dbs.default.host").unwrap(), "db.local");
    }

    const SHIPPED_DEVELOPMENT_CONF: &str =
        concat!(env!("CARGO_MANIFEST_DIR"), "/../conf/development.conf");

    #[test]
    fn shipped_development_conf_serves_both_prefixes() {
        let doc = ConfigDocument::load_with_env(Path::new(SHIPPED_DEVELOPMENT_CONF), &no_env)
            .unwrap();

        for prefix in [ConfigKeyPrefix::Play, ConfigKeyPrefix::Slick] {
            let settings = doc.database_settings(prefix).unwrap();
            assert_eq!(settings.host, "localhost");
            assert_eq!(settings.port, 5432);
            assert_eq!(settings.name, "ellipsis");
            assert_eq!(settings.username, "ellipsis");
            assert_eq!(settings.password, "ellipsis");
        }
    }

    #[test]
    fn shipped_development_conf_env_overrides_reach_slick_layout() {
        let env: HashMap<&str, &str> =
            HashMap::from([("DB_HOST", "db.internal"), ("DB_PASSWORD", "secret")]);
        let lookup = |name: &str| env.get(name).map(|v| v.to_string());
        let doc = ConfigDocument::load_with_env(Path::new(SHIPPED_DEVELOPMENT_CONF), &lookup)
            .unwrap();

        let slick = doc.database_settings(ConfigKeyPrefix::Slick).unwrap();
        assert_eq!(slick.host, "db.internal");
        assert_eq!(slick.password, "secret");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ConfigDocument::load(Path::new("/nonexistent/development.conf")).unwrap_err();

        assert!(matches!(err, ConfigFileError::Io { .. }));
    }
}
