//! Canonical Quant implementations used across tests.
//!
//! One type per build outcome, so tests pick the failure they want by
//! name instead of redefining near-identical fixtures.

use serde::Deserialize;

use crate::quant::{Inputs, Quant, Value};

/// Passes every stage: prepends its configured prefix to the `text`
/// input.
#[derive(Debug, Deserialize)]
pub struct EchoQuant {
    pub prefix: String,
}

#[derive(Deserialize)]
struct EchoArgs {
    text: String,
}

impl Quant for EchoQuant {
    fn call(&self, inputs: &Inputs) -> anyhow::Result<Value> {
        let EchoArgs { text } = inputs.decode()?;
        Ok(Value::String(format!("{}{}", self.prefix, text)))
    }

    fn example_inputs(&self) -> Vec<Inputs> {
        vec![
            Inputs::new().with("text", "hi"),
            Inputs::new().with("text", ""),
        ]
    }
}

/// Declares example inputs that omit `text`, which its call requires, so
/// it fails its own self-test.
#[derive(Debug, Deserialize)]
pub struct LyingQuant {}

impl Quant for LyingQuant {
    fn call(&self, inputs: &Inputs) -> anyhow::Result<Value> {
        let EchoArgs { text } = inputs.decode()?;
        Ok(Value::String(text))
    }

    fn example_inputs(&self) -> Vec<Inputs> {
        vec![Inputs::new()]
    }
}

/// Declares no example inputs at all.
#[derive(Debug, Deserialize)]
pub struct SilentQuant {}

impl Quant for SilentQuant {
    fn call(&self, _inputs: &Inputs) -> anyhow::Result<Value> {
        Ok(Value::Null)
    }

    fn example_inputs(&self) -> Vec<Inputs> {
        Vec::new()
    }
}

/// A constructible type that is not a Quant at all: it lacks both the
/// call operation and the example-inputs operation, so interface
/// validation must reject it before any self-test.
#[derive(Debug, Deserialize)]
pub struct PlainWidget {
    #[serde(default)]
    pub size: u32,
}
