//! Interface descriptors for built objects.
//!
//! An [`Interface`] names the capability set a freshly built object must
//! satisfy before it is handed to the caller. Conformance is an explicit
//! capability check performed at build time on the type-erased artifact,
//! not a language-level inheritance test: an interface is a set of
//! accepted concrete Quant types, each with a cast that recovers the
//! callable surface. A family interface (one contract, many
//! implementations) is the union of its members; see
//! [`Interface::any_of`].
//!
//! ```
//! use reqm::interface::Interface;
//! use reqm::quant::{Inputs, Quant, Value};
//!
//! struct Echo;
//!
//! impl Quant for Echo {
//!     fn call(&self, inputs: &Inputs) -> anyhow::Result<Value> {
//!         Ok(inputs.get("text").cloned().unwrap_or(Value::Null))
//!     }
//!
//!     fn example_inputs(&self) -> Vec<Inputs> {
//!         vec![Inputs::new().with("text", "hi")]
//!     }
//! }
//!
//! let interface = Interface::of::<Echo>();
//! assert_eq!(interface.name(), "Echo");
//! ```

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;

use crate::catalog::Artifact;
use crate::quant::{BoxedQuant, Quant};

type CastFn =
    fn(Box<dyn Any + Send + Sync>) -> std::result::Result<BoxedQuant, Box<dyn Any + Send + Sync>>;

fn cast_to<T: Quant>(
    object: Box<dyn Any + Send + Sync>,
) -> std::result::Result<BoxedQuant, Box<dyn Any + Send + Sync>> {
    object.downcast::<T>().map(|quant| quant as BoxedQuant)
}

/// Strip the module path from a type name for display.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[derive(Clone)]
struct Variant {
    id: TypeId,
    cast: CastFn,
}

/// A named capability contract that a built object must satisfy.
///
/// Two interfaces are equal when they have the same name and accept the
/// same set of concrete types; the registry uses that equality to decide
/// whether a re-registration is the idempotent no-op or a conflict.
#[derive(Clone)]
pub struct Interface {
    name: Cow<'static, str>,
    variants: Vec<Variant>,
}

impl Interface {
    /// Interface satisfied by exactly the concrete Quant type `T`, named
    /// after the type.
    #[must_use]
    pub fn of<T: Quant>() -> Self {
        Self::named::<T>(short_type_name::<T>())
    }

    /// Interface satisfied by the concrete Quant type `T`, under an
    /// explicit name.
    #[must_use]
    pub fn named<T: Quant>(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            variants: vec![Variant {
                id: TypeId::of::<T>(),
                cast: cast_to::<T>,
            }],
        }
    }

    /// Union of several interfaces under one name.
    ///
    /// This is the shape of a research-to-production family: one abstract
    /// contract, several swappable implementations. An artifact satisfies
    /// the union when it satisfies any member.
    ///
    /// ```ignore
    /// let summarizer = Interface::any_of(
    ///     "Summarizer",
    ///     [Interface::of::<VerboseSummarizer>(), Interface::of::<TerseSummarizer>()],
    /// );
    /// ```
    #[must_use]
    pub fn any_of(
        name: impl Into<Cow<'static, str>>,
        members: impl IntoIterator<Item = Interface>,
    ) -> Self {
        let mut variants: Vec<Variant> = Vec::new();
        for member in members {
            for variant in member.variants {
                if !variants.iter().any(|v| v.id == variant.id) {
                    variants.push(variant);
                }
            }
        }
        Self {
            name: name.into(),
            variants,
        }
    }

    /// The interface name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check conformance and recover the callable surface.
    ///
    /// On success the artifact's object is returned as a [`BoxedQuant`];
    /// on mismatch the artifact comes back unchanged so the caller can
    /// report its concrete type.
    pub fn conform(&self, artifact: Artifact) -> std::result::Result<BoxedQuant, Artifact> {
        let id = artifact.type_id();
        match self.variants.iter().find(|v| v.id == id) {
            Some(variant) => {
                let (target, type_name, object) = artifact.into_parts();
                (variant.cast)(object)
                    .map_err(|object| Artifact::from_parts(target, type_name, object))
            }
            None => Err(artifact),
        }
    }
}

impl PartialEq for Interface {
    fn eq(&self, other: &Self) -> bool {
        if self.name != other.name {
            return false;
        }
        let mut ours: Vec<TypeId> = self.variants.iter().map(|v| v.id).collect();
        let mut theirs: Vec<TypeId> = other.variants.iter().map(|v| v.id).collect();
        ours.sort();
        theirs.sort();
        ours == theirs
    }
}

impl Eq for Interface {}

impl fmt::Debug for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interface")
            .field("name", &self.name)
            .field("variants", &self.variants.len())
            .finish()
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
