//! The build pipeline.
//!
//! `build` is the crate's core guarantee: no caller ever receives an
//! object that cannot run with at least one known-good input, and every
//! failure is attributable to a specific stage: lookup, config
//! resolution, instantiation, interface validation, or self-test.

use tracing::{debug, info};

use crate::catalog::Instantiator;
use crate::config::ConfigSource;
use crate::error::{BuildError, Error, Result};
use crate::quant::BoxedQuant;
use crate::registry::Registry;

/// Builds validated Quant instances from registered aliases.
///
/// Borrows the registry and the two external capabilities; holds no state
/// of its own, so concurrent builds proceed independently.
pub struct Factory<'a> {
    registry: &'a Registry,
    config: &'a dyn ConfigSource,
    instantiator: &'a dyn Instantiator,
}

impl<'a> Factory<'a> {
    #[must_use]
    pub fn new(
        registry: &'a Registry,
        config: &'a dyn ConfigSource,
        instantiator: &'a dyn Instantiator,
    ) -> Self {
        Self {
            registry,
            config,
            instantiator,
        }
    }

    /// Build, validate, and self-test the Quant behind `alias`.
    ///
    /// Pipeline:
    ///
    /// 1. Registry lookup. A missing alias propagates unchanged as
    ///    [`RegistryError::NotFound`](crate::error::RegistryError).
    /// 2. Config resolution through the [`ConfigSource`].
    /// 3. Instantiation through the [`Instantiator`].
    /// 4. Interface validation against the registered contract.
    /// 5. Self-test: one call per declared example input set.
    ///
    /// The instance is returned only when every stage passes.
    ///
    /// # Errors
    ///
    /// Stage 1 failures surface as registry errors; stages 2–5 as the
    /// corresponding [`BuildError`] variant, each naming the alias.
    pub fn build(&self, alias: &str, overrides: &[String]) -> Result<BoxedQuant> {
        let registration = self.registry.lookup(alias)?;

        debug!(
            alias,
            config_path = %registration.config_path,
            "resolving config"
        );
        let tree = self
            .config
            .resolve(&registration.config_path, overrides)
            .map_err(|source| BuildError::ConfigResolution {
                alias: alias.to_string(),
                config_path: registration.config_path.clone(),
                source,
            })?;

        debug!(alias, target_id = tree.target(), "instantiating target");
        let artifact =
            self.instantiator
                .instantiate(&tree)
                .map_err(|source| BuildError::Instantiation {
                    alias: alias.to_string(),
                    target: tree.target().to_string(),
                    source,
                })?;

        let type_name = artifact.type_name();
        let quant = registration.interface.conform(artifact).map_err(|rejected| {
            Error::Build(BuildError::InterfaceMismatch {
                alias: alias.to_string(),
                expected: registration.interface.name().to_string(),
                actual: rejected.type_name(),
            })
        })?;

        self.self_test(alias, &quant)?;

        info!(alias, type_name, "quant built and validated");
        Ok(quant)
    }

    /// Run the freshly built Quant against its own declared examples.
    fn self_test(&self, alias: &str, quant: &BoxedQuant) -> Result<()> {
        let input_sets = quant.example_inputs();
        if input_sets.is_empty() {
            return Err(BuildError::NoExampleInputs {
                alias: alias.to_string(),
            }
            .into());
        }

        for (input_set, inputs) in input_sets.iter().enumerate() {
            debug!(alias, input_set, "running self-test");
            quant.call(inputs).map_err(|source| BuildError::SelfTest {
                alias: alias.to_string(),
                input_set,
                source,
            })?;
        }
        Ok(())
    }
}
