//! Public facade: the two entry points, `register` and `get`.
//!
//! [`Reqm`] is an explicit, injectable facade owning an alias registry, a
//! config source, and a target catalog. The crate-level free functions
//! delegate to a lazily-constructed process-wide default instance so that
//! the common case stays two calls:
//!
//! ```no_run
//! use reqm::{Inputs, Interface, Quant, Value};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct EchoQuant {
//!     prefix: String,
//! }
//!
//! impl Quant for EchoQuant {
//!     fn call(&self, inputs: &Inputs) -> anyhow::Result<Value> {
//!         let text = inputs.get("text").and_then(Value::as_str).unwrap_or("");
//!         Ok(Value::String(format!("{}{}", self.prefix, text)))
//!     }
//!
//!     fn example_inputs(&self) -> Vec<Inputs> {
//!         vec![Inputs::new().with("text", "hi")]
//!     }
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! reqm::register_target::<EchoQuant>("echo");
//! reqm::register("echo/v1", "echo/v1", Interface::of::<EchoQuant>())?;
//!
//! let echo = reqm::get("echo/v1")?;
//! let out = echo.call(&Inputs::new().with("text", "hi"))?;
//! # Ok(())
//! # }
//! ```
//!
//! `get` either returns a fully validated instance or fails; the call
//! site never learns (or needs to learn) which concrete type is behind
//! the alias, only that it satisfies the registered interface.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;

use crate::catalog::TargetCatalog;
use crate::config::{ConfigSource, ConfigTree, TomlConfigSource};
use crate::error::Result;
use crate::factory::Factory;
use crate::interface::Interface;
use crate::quant::BoxedQuant;
use crate::registry::{Alias, Registration, Registry};

/// Environment variable naming the config root for the default facade.
pub const CONFIG_ROOT_ENV: &str = "REQM_CONFIG_ROOT";

/// Config root used when [`CONFIG_ROOT_ENV`] is unset.
pub const DEFAULT_CONFIG_ROOT: &str = "conf";

static DEFAULT: Lazy<Reqm> = Lazy::new(Reqm::new);

/// Facade owning the registry, the config source, and the target catalog.
pub struct Reqm {
    registry: Registry,
    config: Arc<dyn ConfigSource>,
    catalog: TargetCatalog,
}

impl Reqm {
    /// Facade with a TOML config source rooted at `$REQM_CONFIG_ROOT`
    /// (default `conf/`).
    #[must_use]
    pub fn new() -> Self {
        let root = std::env::var(CONFIG_ROOT_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_ROOT));
        Self::with_root(root)
    }

    /// Facade with a TOML config source rooted at `root`.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self::with_config_source(Arc::new(TomlConfigSource::new(root)))
    }

    /// Facade over a custom config source.
    #[must_use]
    pub fn with_config_source(config: Arc<dyn ConfigSource>) -> Self {
        Self {
            registry: Registry::new(),
            config,
            catalog: TargetCatalog::new(),
        }
    }

    /// The alias registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The target constructor catalog.
    #[must_use]
    pub fn catalog(&self) -> &TargetCatalog {
        &self.catalog
    }

    /// Bind `alias` to a config path and required interface.
    ///
    /// Identical re-registration is a no-op; any difference is a
    /// conflict.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Conflict`](crate::error::RegistryError)
    /// when the alias is already bound differently.
    pub fn register(
        &self,
        alias: impl Into<Alias>,
        config_path: impl Into<String>,
        interface: Interface,
    ) -> Result<()> {
        self.registry
            .register(alias.into(), Registration::new(config_path, interface))?;
        Ok(())
    }

    /// Bind `alias`, replacing any existing registration; returns the
    /// previous one.
    pub fn register_replacing(
        &self,
        alias: impl Into<Alias>,
        config_path: impl Into<String>,
        interface: Interface,
    ) -> Option<Registration> {
        self.registry
            .register_replacing(alias.into(), Registration::new(config_path, interface))
    }

    /// Register a target whose constructor args are the config args.
    pub fn register_target<T>(&self, target: impl Into<String>)
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.catalog.register::<T>(target);
    }

    /// Register a target with a custom, fallible constructor.
    pub fn register_target_fn<T, F>(&self, target: impl Into<String>, construct: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&ConfigTree) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        self.catalog.register_fn(target, construct);
    }

    /// Build, validate, and self-test the Quant behind `alias`.
    ///
    /// Every call is an independent build: config is re-resolved, the
    /// object re-instantiated, the self-test re-run. Nothing is cached.
    ///
    /// # Errors
    ///
    /// See [`Factory::build`] for the per-stage failure taxonomy.
    pub fn get(&self, alias: impl AsRef<str>) -> Result<BoxedQuant> {
        self.get_with_overrides(alias, &[])
    }

    /// [`get`](Reqm::get) with config override strings applied during
    /// resolution (`"dotted.path=value"`).
    ///
    /// # Errors
    ///
    /// See [`Factory::build`].
    pub fn get_with_overrides(
        &self,
        alias: impl AsRef<str>,
        overrides: &[String],
    ) -> Result<BoxedQuant> {
        Factory::new(&self.registry, self.config.as_ref(), &self.catalog)
            .build(alias.as_ref(), overrides)
    }
}

impl Default for Reqm {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide default facade used by the crate-level free
/// functions. Constructed lazily on first use.
#[must_use]
pub fn global() -> &'static Reqm {
    &DEFAULT
}

/// Bind an alias on the default facade. See [`Reqm::register`].
///
/// # Errors
///
/// Returns a conflict error when the alias is already bound differently.
pub fn register(
    alias: impl Into<Alias>,
    config_path: impl Into<String>,
    interface: Interface,
) -> Result<()> {
    global().register(alias, config_path, interface)
}

/// Build the Quant behind an alias on the default facade. See
/// [`Reqm::get`].
///
/// # Errors
///
/// See [`Factory::build`] for the per-stage failure taxonomy.
pub fn get(alias: impl AsRef<str>) -> Result<BoxedQuant> {
    global().get(alias)
}

/// Register a serde-constructed target on the default facade.
pub fn register_target<T>(target: impl Into<String>)
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    global().register_target::<T>(target);
}

/// Register a custom-constructed target on the default facade.
pub fn register_target_fn<T, F>(target: impl Into<String>, construct: F)
where
    T: Send + Sync + 'static,
    F: Fn(&ConfigTree) -> anyhow::Result<T> + Send + Sync + 'static,
{
    global().register_target_fn(target, construct);
}
