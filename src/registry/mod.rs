//! Registry of JSON step functions
//!
//! Pipelines loaded from configuration refer to their callables by name.
//! Each registered function takes positional JSON arguments and answers with
//! a tagged envelope (see [`envelope`]).

pub mod builtins;
pub mod envelope;

use crate::core::{Accumulator, ArgOrder, Step};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// A function callable from a configured step
pub type JsonFunction = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
}

/// Name and description of a registered function
#[derive(Debug, Clone, Serialize)]
pub struct FunctionInfo {
    pub name: String,
    pub description: String,
}

struct RegisteredFunction {
    description: String,
    function: JsonFunction,
}

/// Named JSON functions available to configured pipelines
pub struct FunctionRegistry {
    functions: BTreeMap<String, RegisteredFunction>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            functions: BTreeMap::new(),
        }
    }

    /// Create a registry holding the built-in functions
    pub fn builtins() -> Self {
        let mut registry = Self::new();
        for (name, description, function) in builtins::BUILTINS {
            registry.register(*name, *description, *function);
        }
        registry
    }

    /// Register a function, replacing any previous one with the same name
    pub fn register<F>(&mut self, name: impl Into<String>, description: impl Into<String>, function: F)
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.functions.insert(
            name.into(),
            RegisteredFunction {
                description: description.into(),
                function: Arc::new(function),
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<JsonFunction> {
        self.functions.get(name).map(|f| f.function.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered functions, sorted by name
    pub fn describe(&self) -> Vec<FunctionInfo> {
        self.functions
            .iter()
            .map(|(name, f)| FunctionInfo {
                name: name.clone(),
                description: f.description.clone(),
            })
            .collect()
    }

    /// Build an invoke step calling `function`
    ///
    /// With no `keys` the function receives one argument, the whole
    /// accumulator as a JSON object, and `extra_args` are not passed.
    pub fn bind(
        &self,
        step: &str,
        function: &str,
        keys: Vec<String>,
        extra_args: Vec<Value>,
        order: ArgOrder,
    ) -> Result<Step<String, Value>, RegistryError> {
        let f = self
            .get(function)
            .ok_or_else(|| RegistryError::UnknownFunction(function.to_string()))?;
        let step_name = step.to_string();

        if keys.is_empty() {
            Ok(Step::invoke(move |acc: &Accumulator<String, Value>| {
                envelope::classify(&step_name, f(&[acc.to_json()]))
            }))
        } else {
            Ok(Step::invoke_with(keys, extra_args, order, move |args: Vec<Value>| {
                envelope::classify(&step_name, f(args.as_slice()))
            }))
        }
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::builtins()
    }
}
