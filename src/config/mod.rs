//! Configuration resolution port and the merged configuration tree.
//!
//! The hierarchical configuration-composition engine is an external
//! collaborator: this crate only consumes a "resolve config path →
//! merged tree" capability through the [`ConfigSource`] trait and never
//! parses, merges, or mutates configuration itself. The crate ships one
//! default adapter, [`TomlConfigSource`], which resolves TOML files with
//! single-inheritance `extends` composition and Hydra-style
//! `dotted.path=value` override strings.

mod toml_source;

pub use toml_source::TomlConfigSource;

use crate::error::ConfigError;
use crate::quant::Value;

/// Reserved key naming the construction target inside a config tree.
///
/// Kept underscore-delimited for compatibility with configs written for
/// the original ecosystem.
pub const TARGET_KEY: &str = "_target_";

/// A fully-merged configuration tree: a construction target identifier
/// plus the constructor arguments for it.
///
/// Produced by a [`ConfigSource`]; passed through to the instantiation
/// capability untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTree {
    target: String,
    args: serde_json::Map<String, Value>,
}

impl ConfigTree {
    #[must_use]
    pub fn new(target: impl Into<String>, args: serde_json::Map<String, Value>) -> Self {
        Self {
            target: target.into(),
            args,
        }
    }

    /// The construction target identifier.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Constructor arguments keyed by parameter name.
    #[must_use]
    pub fn args(&self) -> &serde_json::Map<String, Value> {
        &self.args
    }

    /// Look up a single constructor argument.
    #[must_use]
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }
}

/// Port: resolve a config path plus override strings into a merged tree.
///
/// Implementations own file discovery, composition, and merging entirely;
/// the build pipeline treats them as a black box and wraps any failure
/// into a build error naming the alias and config path.
pub trait ConfigSource: Send + Sync {
    /// Resolve `config_path`, apply `overrides`, and return the merged
    /// tree.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for any resolution failure: missing
    /// file, parse error, invalid override, missing target key.
    fn resolve(
        &self,
        config_path: &str,
        overrides: &[String],
    ) -> std::result::Result<ConfigTree, ConfigError>;
}
