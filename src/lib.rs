//! reqm - Config-driven factory for validated, self-testing callable units.
//!
//! This crate turns a short alias string into a validated, ready-to-use
//! callable object (a "Quant"), built from a declarative configuration
//! tree and checked against a registered interface before it reaches the
//! caller.
//!
//! # Architecture
//!
//! The crate is a five-stage build pipeline over two external
//! capabilities, both modeled as ports with default adapters:
//!
//! - **`registry`** - Alias → (config path, interface) bindings with
//!   conflict detection
//! - **`config`** - `ConfigSource` port resolving a config path plus
//!   override strings into a merged tree; `TomlConfigSource` default
//!   adapter
//! - **`catalog`** - `Instantiator` port constructing the tree's target;
//!   `TargetCatalog` default adapter (registered constructors, serde args)
//! - **`factory`** - lookup → resolve → instantiate → interface check →
//!   self-test; every failure names its stage and alias
//! - **`facade`** - the `register`/`get` surface over a process-wide
//!   default instance
//!
//! A returned instance has always passed both interface conformance and a
//! call with each of its own declared example input sets; a Quant that
//! cannot run with at least one known-good input never reaches a caller.
//!
//! # Modules
//!
//! - [`quant`] - The `Quant` contract and the named-input model
//! - [`interface`] - Interface descriptors and conformance checking
//! - [`registry`] - Alias registry
//! - [`config`] - Config resolution port and TOML adapter
//! - [`catalog`] - Instantiation port and target catalog
//! - [`factory`] - The build pipeline
//! - [`facade`] - Public entry points
//! - [`error`] - Failure taxonomy, one variant per pipeline stage
//!
//! # Example
//!
//! ```no_run
//! use reqm::{Inputs, Interface, Quant, Value};
//! use serde::Deserialize;
//!
//! // 1. Define a Quant: constructor args come from config, calls take
//! //    named inputs, and example_inputs makes it auditable.
//! #[derive(Deserialize)]
//! struct Greeter {
//!     greeting: String,
//! }
//!
//! impl Quant for Greeter {
//!     fn call(&self, inputs: &Inputs) -> anyhow::Result<Value> {
//!         let name = inputs.get("name").and_then(Value::as_str).unwrap_or("world");
//!         Ok(Value::String(format!("{}, {}!", self.greeting, name)))
//!     }
//!
//!     fn example_inputs(&self) -> Vec<Inputs> {
//!         vec![Inputs::new().with("name", "world")]
//!     }
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! // 2. Register the construction target and the alias.
//! reqm::register_target::<Greeter>("greeter");
//! reqm::register("greeter/friendly", "greeter/friendly", Interface::of::<Greeter>())?;
//!
//! // 3. get() resolves config, instantiates, validates, self-tests.
//! let greeter = reqm::get("greeter/friendly")?;
//! let out = greeter.call(&Inputs::new().with("name", "world"))?;
//! # Ok(())
//! # }
//! ```
//!
//! with `conf/greeter/friendly.toml`:
//!
//! ```toml
//! _target_ = "greeter"
//! greeting = "Hello"
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod facade;
pub mod factory;
pub mod interface;
pub mod quant;
pub mod registry;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use error::{BuildError, ConfigError, Error, InstantiationError, RegistryError, Result};
pub use facade::{get, global, register, register_target, register_target_fn, Reqm};
pub use interface::Interface;
pub use quant::{BoxedQuant, Inputs, Quant, Value};
pub use registry::{Alias, Registration, Registry};
