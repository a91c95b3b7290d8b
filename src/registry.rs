//! Alias registry: the process-wide alias → registration map.
//!
//! The registry is an explicit object with interior mutability, not an
//! ambient global: construct one (or use the default facade, which owns
//! one) and share it by reference. Reads and writes are serialized behind
//! a `parking_lot` lock; no lock is held across calls into other
//! components.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::RegistryError;
use crate::interface::Interface;

/// Opaque, hierarchical string key identifying a registration, e.g.
/// `"summarizer/prod"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Alias(String);

impl Alias {
    #[must_use]
    pub fn new(alias: impl Into<String>) -> Self {
        Self(alias.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Alias {
    fn from(alias: &str) -> Self {
        Self(alias.to_string())
    }
}

impl From<String> for Alias {
    fn from(alias: String) -> Self {
        Self(alias)
    }
}

impl Borrow<str> for Alias {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The (config_path, interface) pair bound to an alias.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    /// Location the config source resolves into a merged configuration
    /// tree.
    pub config_path: String,
    /// Capability contract the built object must satisfy.
    pub interface: Interface,
}

impl Registration {
    #[must_use]
    pub fn new(config_path: impl Into<String>, interface: Interface) -> Self {
        Self {
            config_path: config_path.into(),
            interface,
        }
    }
}

impl fmt::Display for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "config '{}' with interface '{}'",
            self.config_path, self.interface
        )
    }
}

/// Thread-safe alias → registration map.
#[derive(Default)]
pub struct Registry {
    entries: RwLock<HashMap<Alias, Registration>>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an alias to a registration.
    ///
    /// Re-registering an identical (config_path, interface) pair is a
    /// no-op. Any difference is a conflict; use
    /// [`register_replacing`](Registry::register_replacing) to rebind
    /// deliberately.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Conflict`] when the alias is already bound
    /// to a different registration.
    pub fn register(
        &self,
        alias: Alias,
        registration: Registration,
    ) -> std::result::Result<(), RegistryError> {
        let mut entries = self.entries.write();
        if let Some(existing) = entries.get(&alias) {
            if *existing == registration {
                debug!(alias = %alias, "alias already registered identically; no-op");
                return Ok(());
            }
            return Err(RegistryError::Conflict {
                alias: alias.to_string(),
                existing: existing.to_string(),
                proposed: registration.to_string(),
            });
        }
        info!(
            alias = %alias,
            config_path = %registration.config_path,
            interface = %registration.interface,
            "alias registered"
        );
        entries.insert(alias, registration);
        Ok(())
    }

    /// Bind an alias, replacing any existing registration.
    ///
    /// Returns the previous registration when the alias was already bound.
    pub fn register_replacing(
        &self,
        alias: Alias,
        registration: Registration,
    ) -> Option<Registration> {
        let mut entries = self.entries.write();
        let previous = entries.insert(alias.clone(), registration);
        if previous.is_some() {
            info!(alias = %alias, "alias re-registered, previous binding replaced");
        }
        previous
    }

    /// Look up the registration bound to an alias.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when the alias is not
    /// registered.
    pub fn lookup(&self, alias: &str) -> std::result::Result<Registration, RegistryError> {
        self.entries
            .read()
            .get(alias)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                alias: alias.to_string(),
            })
    }

    /// Whether an alias is registered.
    #[must_use]
    pub fn contains(&self, alias: &str) -> bool {
        self.entries.read().contains_key(alias)
    }

    /// Sorted snapshot of all registered aliases.
    #[must_use]
    pub fn aliases(&self) -> Vec<Alias> {
        let mut aliases: Vec<Alias> = self.entries.read().keys().cloned().collect();
        aliases.sort();
        aliases
    }

    /// Number of registered aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
