//! Pipeline configuration from YAML

use crate::core::{ArgOrder, KeyFilter, ObserveOptions, Step, StepSequence};
use crate::registry::FunctionRegistry;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::warn;

/// Top-level pipeline configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pipeline name
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Pipeline steps, in execution order
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

/// Step configuration as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawStepConfig", into = "RawStepConfig")]
pub struct StepConfig {
    /// Unique step name
    pub name: String,

    /// What the step does
    pub kind: StepKindConfig,
}

/// The three kinds of step, keyed by `put`, `invoke` or `observe`
#[derive(Debug, Clone)]
pub enum StepKindConfig {
    /// Literal value
    Put(Value),
    /// Call a registry function
    Invoke(InvokeConfig),
    /// Show the accumulator
    Observe(ObserveConfig),
}

/// A step as written, before checking that exactly one kind key is present
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStepConfig {
    name: String,

    // `put: null` is a value, so presence is tracked separately from content
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    put: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    invoke: Option<InvokeConfig>,

    // A bare `observe:` shows everything
    #[serde(default, deserialize_with = "present_or_default", skip_serializing_if = "Option::is_none")]
    observe: Option<ObserveConfig>,
}

fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn present_or_default<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?.unwrap_or_default()))
}

impl TryFrom<RawStepConfig> for StepConfig {
    type Error = String;

    fn try_from(raw: RawStepConfig) -> std::result::Result<Self, Self::Error> {
        let kind = match (raw.put, raw.invoke, raw.observe) {
            (Some(value), None, None) => StepKindConfig::Put(value),
            (None, Some(invoke), None) => StepKindConfig::Invoke(invoke),
            (None, None, Some(observe)) => StepKindConfig::Observe(observe),
            (None, None, None) => {
                return Err(format!(
                    "Step '{}' needs one of 'put', 'invoke' or 'observe'",
                    raw.name
                ))
            }
            _ => {
                return Err(format!(
                    "Step '{}' must use only one of 'put', 'invoke' or 'observe'",
                    raw.name
                ))
            }
        };

        Ok(StepConfig { name: raw.name, kind })
    }
}

impl From<StepConfig> for RawStepConfig {
    fn from(step: StepConfig) -> Self {
        let mut raw = RawStepConfig {
            name: step.name,
            put: None,
            invoke: None,
            observe: None,
        };
        match step.kind {
            StepKindConfig::Put(value) => raw.put = Some(value),
            StepKindConfig::Invoke(invoke) => raw.invoke = Some(invoke),
            StepKindConfig::Observe(observe) => raw.observe = Some(observe),
        }
        raw
    }
}

/// Invoke step configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InvokeConfig {
    /// Registry function name
    #[serde(rename = "fn")]
    pub function: String,

    /// Earlier steps whose values become positional arguments.
    /// Empty means the function receives the whole accumulator.
    #[serde(default)]
    pub select: Vec<String>,

    /// Literal extra arguments
    #[serde(default)]
    pub args: Vec<Value>,

    /// Whether `args` go after (`prepend`) or before (`append`) the selection
    #[serde(default)]
    pub order: OrderConfig,
}

/// Argument order as written in YAML
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderConfig {
    #[default]
    Prepend,
    Append,
}

impl From<OrderConfig> for ArgOrder {
    fn from(order: OrderConfig) -> Self {
        match order {
            OrderConfig::Prepend => ArgOrder::Prepend,
            OrderConfig::Append => ArgOrder::Append,
        }
    }
}

/// Observe step configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObserveConfig {
    /// Heading shown with the snapshot
    #[serde(default)]
    pub label: Option<String>,

    /// Show only these keys
    #[serde(default)]
    pub only: Option<Vec<String>>,

    /// Show only keys matching this regex
    #[serde(default)]
    pub matching: Option<String>,
}

impl ObserveConfig {
    /// Build the runtime options
    pub fn to_options(&self) -> Result<ObserveOptions<String>> {
        let filter = match (&self.only, &self.matching) {
            (Some(_), Some(_)) => anyhow::bail!("Observe filter must use either 'only' or 'matching', not both"),
            (Some(keys), None) => KeyFilter::Only(keys.clone()),
            (None, Some(pattern)) => KeyFilter::Matching(
                Regex::new(pattern).with_context(|| format!("Invalid observe pattern '{}'", pattern))?,
            ),
            (None, None) => KeyFilter::All,
        };

        Ok(ObserveOptions {
            label: self.label.clone(),
            filter,
        })
    }
}

impl PipelineConfig {
    /// Load pipeline configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse pipeline configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the parts of the configuration that do not need a registry
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Pipeline name must not be empty");
        }

        for step in &self.steps {
            if step.name.trim().is_empty() {
                anyhow::bail!("Step names must not be empty");
            }

            match &step.kind {
                StepKindConfig::Observe(observe) => {
                    observe
                        .to_options()
                        .with_context(|| format!("Step '{}' has an invalid observe filter", step.name))?;
                }
                StepKindConfig::Invoke(invoke) => {
                    if invoke.select.is_empty() && !invoke.args.is_empty() {
                        warn!(
                            "Step '{}' selects no keys; its {} literal argument(s) are ignored",
                            step.name,
                            invoke.args.len()
                        );
                    }
                }
                StepKindConfig::Put(_) => {}
            }
        }

        Ok(())
    }

    /// Replace the values of `put` steps
    pub fn with_overrides(mut self, overrides: &[(String, Value)]) -> Result<Self> {
        for (name, value) in overrides {
            let step = self
                .steps
                .iter_mut()
                .find(|s| &s.name == name)
                .with_context(|| format!("Cannot override unknown step '{}'", name))?;

            match &mut step.kind {
                StepKindConfig::Put(current) => *current = value.clone(),
                _ => anyhow::bail!("Step '{}' is not a put step and cannot be overridden", name),
            }
        }
        Ok(self)
    }

    /// Build the step sequence, resolving functions through `registry`
    pub fn to_sequence(&self, registry: &FunctionRegistry) -> Result<StepSequence<String, Value>> {
        let mut sequence = StepSequence::new();

        for config in &self.steps {
            let step = match &config.kind {
                StepKindConfig::Put(value) => Step::Put(value.clone()),
                StepKindConfig::Invoke(invoke) => registry
                    .bind(
                        &config.name,
                        &invoke.function,
                        invoke.select.clone(),
                        invoke.args.clone(),
                        invoke.order.into(),
                    )
                    .with_context(|| format!("Step '{}' cannot be bound", config.name))?,
                StepKindConfig::Observe(observe) => Step::Observe(observe.to_options()?),
            };

            sequence = sequence
                .then(config.name.clone(), step)
                .with_context(|| format!("Invalid pipeline '{}'", self.name))?;
        }

        Ok(sequence)
    }
}
