//! TOML-backed config source.
//!
//! Resolves a config path to a TOML file under a root directory, merges
//! `extends` chains (child keys win, tables merge deep), applies
//! `dotted.path=value` override strings, and extracts the `_target_` key.
//!
//! Config shape, one file per buildable unit:
//!
//! ```toml
//! # conf/greeter/friendly.toml
//! _target_ = "greeter"
//! greeting = "Hello"
//! punctuation = "!"
//! ```
//!
//! A variant can inherit and override another config:
//!
//! ```toml
//! # conf/greeter/shouty.toml
//! extends = "greeter/friendly"
//! greeting = "HEY"
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{ConfigSource, ConfigTree, TARGET_KEY};
use crate::error::ConfigError;
use crate::quant::Value;

/// Key a config uses to inherit from another config path.
const EXTENDS_KEY: &str = "extends";

/// [`ConfigSource`] adapter reading TOML files from a root directory.
pub struct TomlConfigSource {
    root: PathBuf,
}

impl TomlConfigSource {
    /// Create a source rooted at `root`.
    ///
    /// A config path `"greeter/friendly"` resolves to
    /// `<root>/greeter/friendly.toml`. Absolute config paths bypass the
    /// root; paths that already carry an extension are used as given.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory config paths resolve under.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locate(&self, config_path: &str) -> PathBuf {
        let path = Path::new(config_path);
        let mut located = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        if located.extension().is_none() {
            located.set_extension("toml");
        }
        located
    }

    /// Load a config file and fold in its `extends` ancestry, child keys
    /// winning.
    fn load_merged(
        &self,
        config_path: &str,
        visited: &mut Vec<PathBuf>,
    ) -> std::result::Result<toml::Table, ConfigError> {
        let file = self.locate(config_path);
        let display = file.display().to_string();

        if visited.contains(&file) {
            return Err(ConfigError::CircularExtends { path: display });
        }
        visited.push(file.clone());

        let content = std::fs::read_to_string(&file).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: display.clone(),
                    source,
                }
            } else {
                ConfigError::Read {
                    path: display.clone(),
                    source,
                }
            }
        })?;

        let mut table: toml::Table = content.parse().map_err(|source| ConfigError::Parse {
            path: display.clone(),
            source,
        })?;

        match table.remove(EXTENDS_KEY) {
            None => Ok(table),
            Some(toml::Value::String(parent)) => {
                debug!(config_path, parent = %parent, "merging extends parent");
                let base = self.load_merged(&parent, visited)?;
                Ok(merge_tables(base, table))
            }
            Some(_) => Err(ConfigError::Other(format!(
                "`extends` in '{display}' must be a string config path"
            ))),
        }
    }
}

impl ConfigSource for TomlConfigSource {
    fn resolve(
        &self,
        config_path: &str,
        overrides: &[String],
    ) -> std::result::Result<ConfigTree, ConfigError> {
        let mut visited = Vec::new();
        let mut table = self.load_merged(config_path, &mut visited)?;

        for spec in overrides {
            apply_override(&mut table, spec)?;
        }

        let display = self.locate(config_path).display().to_string();
        let target = match table.remove(TARGET_KEY) {
            Some(toml::Value::String(target)) => target,
            _ => return Err(ConfigError::MissingTarget { path: display }),
        };

        let mut args = serde_json::Map::new();
        for (key, value) in table {
            args.insert(key, toml_to_json(value));
        }

        debug!(config_path, target_id = %target, "config resolved");
        Ok(ConfigTree::new(target, args))
    }
}

/// Deep-merge `overlay` onto `base`: tables merge recursively, everything
/// else is replaced by the overlay value.
fn merge_tables(base: toml::Table, overlay: toml::Table) -> toml::Table {
    let mut merged = base;
    for (key, value) in overlay {
        let combined = match (merged.remove(&key), value) {
            (Some(toml::Value::Table(b)), toml::Value::Table(o)) => {
                toml::Value::Table(merge_tables(b, o))
            }
            (_, v) => v,
        };
        merged.insert(key, combined);
    }
    merged
}

/// Apply one `dotted.path=value` override to the table.
///
/// The value side is parsed as TOML; anything that does not parse is taken
/// as a bare string, so `greeting=Hi` and `greeting="Hi"` both work.
/// Missing intermediate tables are created; a non-table intermediate is an
/// error.
fn apply_override(table: &mut toml::Table, spec: &str) -> std::result::Result<(), ConfigError> {
    let (path, raw_value) = spec.split_once('=').ok_or_else(|| {
        invalid_override(spec, "expected `dotted.path=value`")
    })?;
    let path = path.trim();
    if path.is_empty() {
        return Err(invalid_override(spec, "override key is empty"));
    }

    let value = parse_override_value(raw_value);

    let mut segments = path.split('.').collect::<Vec<_>>();
    let leaf = match segments.pop() {
        Some(leaf) => leaf,
        None => return Err(invalid_override(spec, "override key is empty")),
    };

    let mut current = table;
    for segment in segments {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        current = match entry {
            toml::Value::Table(t) => t,
            _ => {
                return Err(invalid_override(
                    spec,
                    &format!("'{segment}' is not a table"),
                ))
            }
        };
    }
    current.insert(leaf.to_string(), value);
    Ok(())
}

fn invalid_override(spec: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidOverride {
        spec: spec.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse the right-hand side of an override as a TOML value, falling back
/// to a bare string.
fn parse_override_value(raw: &str) -> toml::Value {
    let wrapped = format!("v = {raw}");
    match wrapped.parse::<toml::Table>() {
        Ok(mut table) => table.remove("v").unwrap_or_else(|| {
            toml::Value::String(raw.to_string())
        }),
        Err(_) => toml::Value::String(raw.to_string()),
    }
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
