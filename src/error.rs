//! Error types for the crate.
//!
//! Every build failure is attributable to exactly one pipeline stage:
//! lookup, config resolution, instantiation, interface validation, or
//! self-test. The per-stage enums below carry the context each stage owns
//! (alias, config path, target identifier, underlying cause); the umbrella
//! [`Error`] aggregates them for the public surface.

use thiserror::Error;

/// Alias registration and lookup errors.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The alias is already bound to a different registration.
    #[error(
        "alias '{alias}' is already registered as {existing}; \
         refusing to rebind as {proposed} (use register_replacing to replace it)"
    )]
    Conflict {
        alias: String,
        /// Rendering of the registration currently bound to the alias.
        existing: String,
        /// Rendering of the registration that was rejected.
        proposed: String,
    },

    /// Lookup on an alias nobody registered.
    #[error("alias '{alias}' is not registered; call register(\"{alias}\", ...) first")]
    NotFound { alias: String },
}

/// Configuration resolution errors from the [`ConfigSource`] port.
///
/// [`ConfigSource`]: crate::config::ConfigSource
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file '{path}' not found")]
    NotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A resolved config must carry a string `_target_` key naming the
    /// construction target.
    #[error("config '{path}' is missing a string `_target_` key")]
    MissingTarget { path: String },

    /// An override string did not parse or did not apply to the tree.
    #[error("invalid override '{spec}': {reason}")]
    InvalidOverride { spec: String, reason: String },

    /// `extends` chains must be acyclic.
    #[error("circular `extends` chain involving '{path}'")]
    CircularExtends { path: String },

    #[error("{0}")]
    Other(String),
}

/// Instantiation errors from the [`Instantiator`] port.
///
/// [`Instantiator`]: crate::catalog::Instantiator
#[derive(Error, Debug)]
pub enum InstantiationError {
    /// The target identifier has no registered constructor.
    #[error("unknown target '{target}'; registered targets: [{known}]")]
    UnknownTarget { target: String, known: String },

    /// The config args did not deserialize into the target's constructor
    /// arguments.
    #[error("invalid constructor arguments for target '{target}': {source}")]
    InvalidArgs {
        target: String,
        #[source]
        source: serde_json::Error,
    },

    /// The constructor itself returned an error.
    #[error("constructor for target '{target}' failed: {source}")]
    Constructor {
        target: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Build pipeline failures, one variant per stage.
///
/// Lookup failures are not wrapped here: the factory propagates
/// [`RegistryError::NotFound`] unchanged so callers can always tell an
/// unregistered alias apart from a broken build.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Stage 2: the config source could not produce a merged tree.
    #[error("failed to resolve config '{config_path}' for alias '{alias}': {source}")]
    ConfigResolution {
        alias: String,
        config_path: String,
        #[source]
        source: ConfigError,
    },

    /// Stage 3: the instantiator could not construct the target.
    #[error("failed to instantiate target '{target}' for alias '{alias}': {source}")]
    Instantiation {
        alias: String,
        target: String,
        #[source]
        source: InstantiationError,
    },

    /// Stage 4: the constructed object does not satisfy the registered
    /// interface.
    #[error("alias '{alias}' built a '{actual}' which does not satisfy interface '{expected}'")]
    InterfaceMismatch {
        alias: String,
        expected: String,
        actual: &'static str,
    },

    /// Stage 5: the quant declared no example inputs, so it cannot be
    /// audited at build time.
    #[error(
        "quant '{alias}' declared no example inputs; \
         every quant must expose at least one input set for its self-test"
    )]
    NoExampleInputs { alias: String },

    /// Stage 5: the quant failed when called with its own declared example
    /// inputs. The bug is in the quant or its examples, not in config or
    /// construction.
    #[error("quant '{alias}' failed its self-test on example input set {input_set}: {source}")]
    SelfTest {
        alias: String,
        input_set: usize,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Instantiation(#[from] InstantiationError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
