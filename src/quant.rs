//! The Quant capability contract.
//!
//! A Quant is the unit this crate builds and manages: a callable object
//! whose constructor arguments come from config, invoked with named inputs
//! and auditable through the example inputs it declares for its build-time
//! self-test.
//!
//! # Named inputs
//!
//! The base contract accepts an open-ended set of named inputs
//! ([`Inputs`], a name → value map). A concrete Quant narrows that open
//! signature to its specific parameter list by decoding the map into a
//! typed argument struct with [`Inputs::decode`]; narrowing is an
//! explicit act in the implementation, never implicit:
//!
//! ```
//! use reqm::quant::{Inputs, Quant, Value};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct GreetArgs {
//!     name: String,
//! }
//!
//! struct Greeter {
//!     greeting: String,
//! }
//!
//! impl Quant for Greeter {
//!     fn call(&self, inputs: &Inputs) -> anyhow::Result<Value> {
//!         let GreetArgs { name } = inputs.decode()?;
//!         Ok(Value::String(format!("{}, {}!", self.greeting, name)))
//!     }
//!
//!     fn example_inputs(&self) -> Vec<Inputs> {
//!         vec![Inputs::new().with("name", "world")]
//!     }
//! }
//!
//! let greeter = Greeter { greeting: "Hello".into() };
//! let out = greeter.call(&Inputs::new().with("name", "world")).unwrap();
//! assert_eq!(out, Value::String("Hello, world!".into()));
//! ```

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Dynamic value passed into and out of a Quant.
pub type Value = serde_json::Value;

/// A set of named inputs for one Quant invocation.
///
/// Maps parameter names to dynamic values. Decoding into a typed argument
/// struct ignores extra keys and rejects missing required ones, so a
/// Quant's effective signature is exactly the struct it decodes into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inputs(serde_json::Map<String, Value>);

impl Inputs {
    /// Create an empty input set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named input, builder-style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Insert a named input, replacing any previous value under that name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up a single input by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Number of named inputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode the inputs into a typed argument struct.
    ///
    /// This is how a concrete Quant narrows the open-ended named-input
    /// signature to its specific parameters. Missing required fields fail
    /// the decode (and therefore the call); unknown extra inputs are
    /// ignored, matching keyword-argument semantics.
    ///
    /// # Errors
    ///
    /// Returns the underlying deserialization error when the inputs do not
    /// match the argument struct.
    pub fn decode<T: DeserializeOwned>(&self) -> std::result::Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }

    /// View the inputs as a plain name → value map.
    #[must_use]
    pub fn as_map(&self) -> &serde_json::Map<String, Value> {
        &self.0
    }
}

impl From<serde_json::Map<String, Value>> for Inputs {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Inputs {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Inputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.0.clone()))
    }
}

/// The capability contract every buildable unit must satisfy.
///
/// A Quant is:
///
/// - **Callable** — invoked with named inputs via [`call`](Quant::call)
/// - **Config-driven** — constructor arguments come from a config tree,
///   not from call sites
/// - **Auditable** — [`example_inputs`](Quant::example_inputs) declares
///   inputs the factory uses to verify the Quant actually runs at build
///   time, not silently in production
///
/// The factory never returns an instance that has not passed both the
/// interface check and a call with each declared example input set.
pub trait Quant: Send + Sync + 'static {
    /// Call the Quant with the given named inputs.
    ///
    /// The base contract accepts any input set; implementations narrow to
    /// their specific parameters by decoding (see [`Inputs::decode`]).
    ///
    /// # Errors
    ///
    /// Implementations surface their own failures here; during the build
    /// self-test these become build failures attributed to the self-test
    /// stage.
    fn call(&self, inputs: &Inputs) -> anyhow::Result<Value>;

    /// Example input sets for build-time sanity checking.
    ///
    /// Each set must be expandable into [`call`](Quant::call). The factory
    /// invokes the Quant once per set when building it and fails the build
    /// on the first error. Multiple sets are encouraged: cover the happy
    /// path and the edge cases; they double as living documentation of
    /// valid call shapes. An empty vector fails the build: a Quant that
    /// declares no examples cannot be audited.
    fn example_inputs(&self) -> Vec<Inputs>;
}

/// Owned, type-erased Quant as returned by the factory.
pub type BoxedQuant = Box<dyn Quant>;

impl std::fmt::Debug for dyn Quant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Quant")
    }
}
