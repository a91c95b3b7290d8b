//! Instantiation port and the target constructor catalog.
//!
//! There is no reflection to construct an object from a target identifier,
//! so the instantiation capability is a registered-constructor table: each
//! target id maps to a function that builds a concrete type from the
//! config tree's args. The common case, where constructor arguments are
//! exactly the config args, registers through serde
//! ([`TargetCatalog::register`]); constructors that need custom logic or
//! can fail register a closure ([`TargetCatalog::register_fn`]).
//!
//! Constructed objects come back type-erased as [`Artifact`]s; interface
//! validation downstream decides whether the object satisfies the
//! registered contract.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ConfigTree;
use crate::error::InstantiationError;
use crate::interface::short_type_name;

/// A freshly constructed, type-erased object plus the provenance needed
/// for diagnostics.
pub struct Artifact {
    target: String,
    type_name: &'static str,
    object: Box<dyn Any + Send + Sync>,
}

impl Artifact {
    /// Wrap a concrete object.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(target: impl Into<String>, object: T) -> Self {
        Self {
            target: target.into(),
            type_name: short_type_name::<T>(),
            object: Box::new(object),
        }
    }

    /// Reassemble an artifact from erased parts.
    #[must_use]
    pub fn from_parts(
        target: String,
        type_name: &'static str,
        object: Box<dyn Any + Send + Sync>,
    ) -> Self {
        Self {
            target,
            type_name,
            object,
        }
    }

    /// The target identifier this artifact was constructed from.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Short name of the concrete type inside.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// [`TypeId`] of the concrete type inside.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        (*self.object).type_id()
    }

    /// Split into (target, type_name, object).
    #[must_use]
    pub fn into_parts(self) -> (String, &'static str, Box<dyn Any + Send + Sync>) {
        (self.target, self.type_name, self.object)
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("target", &self.target)
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Port: construct an object from a merged configuration tree.
pub trait Instantiator: Send + Sync {
    /// Construct the tree's target with the tree's args.
    ///
    /// # Errors
    ///
    /// Returns an [`InstantiationError`] when the target is unknown, the
    /// args do not match the constructor, or the constructor itself fails.
    fn instantiate(
        &self,
        tree: &ConfigTree,
    ) -> std::result::Result<Artifact, InstantiationError>;
}

type ConstructFn = Arc<
    dyn Fn(&ConfigTree) -> std::result::Result<Box<dyn Any + Send + Sync>, InstantiationError>
        + Send
        + Sync,
>;

#[derive(Clone)]
struct TargetEntry {
    type_name: &'static str,
    construct: ConstructFn,
}

/// Thread-safe target id → constructor map; the default [`Instantiator`].
#[derive(Default)]
pub struct TargetCatalog {
    targets: RwLock<HashMap<String, TargetEntry>>,
}

impl TargetCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target whose constructor arguments are exactly the
    /// config args, deserialized into `T`.
    pub fn register<T>(&self, target: impl Into<String>)
    where
        T: DeserializeOwned + Any + Send + Sync,
    {
        let target = target.into();
        let id = target.clone();
        self.insert(
            target,
            TargetEntry {
                type_name: short_type_name::<T>(),
                construct: Arc::new(move |tree| {
                    let args = crate::quant::Value::Object(tree.args().clone());
                    let built: T = serde_json::from_value(args).map_err(|source| {
                        InstantiationError::InvalidArgs {
                            target: id.clone(),
                            source,
                        }
                    })?;
                    let object: Box<dyn Any + Send + Sync> = Box::new(built);
                    Ok(object)
                }),
            },
        );
    }

    /// Register a target with a custom, fallible constructor.
    pub fn register_fn<T, F>(&self, target: impl Into<String>, construct: F)
    where
        T: Any + Send + Sync,
        F: Fn(&ConfigTree) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let target = target.into();
        let id = target.clone();
        self.insert(
            target,
            TargetEntry {
                type_name: short_type_name::<T>(),
                construct: Arc::new(move |tree| {
                    let built = construct(tree).map_err(|source| {
                        InstantiationError::Constructor {
                            target: id.clone(),
                            source,
                        }
                    })?;
                    let object: Box<dyn Any + Send + Sync> = Box::new(built);
                    Ok(object)
                }),
            },
        );
    }

    /// Whether a target id has a registered constructor.
    #[must_use]
    pub fn contains(&self, target: &str) -> bool {
        self.targets.read().contains_key(target)
    }

    /// Sorted snapshot of registered target ids.
    #[must_use]
    pub fn targets(&self) -> Vec<String> {
        let mut targets: Vec<String> = self.targets.read().keys().cloned().collect();
        targets.sort();
        targets
    }

    fn insert(&self, target: String, entry: TargetEntry) {
        let replaced = self.targets.write().insert(target.clone(), entry);
        if replaced.is_some() {
            warn!(target_id = %target, "replacing existing target constructor");
        } else {
            debug!(target_id = %target, "target constructor registered");
        }
    }
}

impl Instantiator for TargetCatalog {
    fn instantiate(
        &self,
        tree: &ConfigTree,
    ) -> std::result::Result<Artifact, InstantiationError> {
        let entry = { self.targets.read().get(tree.target()).cloned() };
        let entry = match entry {
            Some(entry) => entry,
            None => {
                return Err(InstantiationError::UnknownTarget {
                    target: tree.target().to_string(),
                    known: self.targets().join(", "),
                })
            }
        };

        let object = (entry.construct)(tree)?;
        debug!(
            target_id = tree.target(),
            type_name = entry.type_name,
            "target instantiated"
        );
        Ok(Artifact::from_parts(
            tree.target().to_string(),
            entry.type_name,
            object,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde::Deserialize;
    use serde_json::Map;

    use crate::quant::Value;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Widget {
        size: u32,
        #[serde(default)]
        label: String,
    }

    fn tree(target: &str, args: &[(&str, Value)]) -> ConfigTree {
        let mut map = Map::new();
        for (k, v) in args {
            map.insert((*k).to_string(), v.clone());
        }
        ConfigTree::new(target, map)
    }

    #[test]
    fn serde_registration_builds_from_args() {
        let catalog = TargetCatalog::new();
        catalog.register::<Widget>("widget");

        let artifact = catalog
            .instantiate(&tree("widget", &[("size", Value::from(7))]))
            .expect("constructs");
        assert_eq!(artifact.target(), "widget");
        assert_eq!(artifact.type_name(), "Widget");

        let widget = artifact
            .into_parts()
            .2
            .downcast::<Widget>()
            .expect("concrete type is Widget");
        assert_eq!(*widget, Widget { size: 7, label: String::new() });
    }

    #[test]
    fn unknown_target_lists_known_targets() {
        let catalog = TargetCatalog::new();
        catalog.register::<Widget>("widget");

        let err = catalog
            .instantiate(&tree("gizmo", &[]))
            .expect_err("gizmo is not registered");
        match err {
            InstantiationError::UnknownTarget { target, known } => {
                assert_eq!(target, "gizmo");
                assert_eq!(known, "widget");
            }
            other => panic!("expected UnknownTarget, got {other:?}"),
        }
    }

    #[test]
    fn bad_args_are_an_invalid_args_error() {
        let catalog = TargetCatalog::new();
        catalog.register::<Widget>("widget");

        let err = catalog
            .instantiate(&tree("widget", &[("size", Value::String("seven".into()))]))
            .expect_err("size must be an integer");
        assert!(matches!(err, InstantiationError::InvalidArgs { .. }));
    }

    #[test]
    fn constructor_errors_are_wrapped() {
        let catalog = TargetCatalog::new();
        catalog.register_fn::<Widget, _>("broken", |_| anyhow::bail!("constructor exploded"));

        let err = catalog
            .instantiate(&tree("broken", &[]))
            .expect_err("constructor fails");
        match err {
            InstantiationError::Constructor { target, source } => {
                assert_eq!(target, "broken");
                assert!(source.to_string().contains("constructor exploded"));
            }
            other => panic!("expected Constructor, got {other:?}"),
        }
    }

    #[test]
    fn custom_constructor_sees_the_tree() {
        let catalog = TargetCatalog::new();
        catalog.register_fn("widget", |tree: &ConfigTree| {
            let size = tree
                .arg("size")
                .and_then(Value::as_u64)
                .unwrap_or(1) as u32;
            Ok(Widget { size, label: tree.target().to_string() })
        });

        let artifact = catalog
            .instantiate(&tree("widget", &[("size", Value::from(3))]))
            .expect("constructs");
        let widget = artifact.into_parts().2.downcast::<Widget>().unwrap();
        assert_eq!(widget.size, 3);
        assert_eq!(widget.label, "widget");
    }

    #[test]
    fn targets_are_sorted() {
        let catalog = TargetCatalog::new();
        catalog.register::<Widget>("b");
        catalog.register::<Widget>("a");
        assert_eq!(catalog.targets(), vec!["a".to_string(), "b".to_string()]);
    }
}
