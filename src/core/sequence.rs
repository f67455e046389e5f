//! Step sequence - the ordered, append-only pipeline definition

use crate::core::{
    accumulator::Accumulator,
    error::BuildError,
    step::{ArgOrder, Invoke, ObserveOptions, Step, StepKey, StepResult},
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// A named step as stored in a sequence
#[derive(Debug)]
struct Entry<K: StepKey, V> {
    name: K,
    step: Step<K, V>,
}

/// An ordered list of uniquely named steps
///
/// Appending never changes an existing sequence: `append` hands back a new
/// one sharing the already-added steps, so a common prefix can be branched
/// into several continuations.
#[derive(Debug)]
pub struct StepSequence<K: StepKey, V> {
    steps: Vec<Arc<Entry<K, V>>>,
    claimed: HashSet<K>,
    // Claimed names that never record a value
    observers: HashSet<K>,
}

impl<K: StepKey, V> Clone for StepSequence<K, V> {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
            claimed: self.claimed.clone(),
            observers: self.observers.clone(),
        }
    }
}

impl<K: StepKey, V> StepSequence<K, V> {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            claimed: HashSet::new(),
            observers: HashSet::new(),
        }
    }

    /// Return a new sequence with `step` appended under `name`
    pub fn append(&self, name: impl Into<K>, step: Step<K, V>) -> Result<Self, BuildError<K>> {
        self.clone().then(name, step)
    }

    /// Append a step, consuming the sequence
    pub fn then(mut self, name: impl Into<K>, step: Step<K, V>) -> Result<Self, BuildError<K>> {
        let name = name.into();

        if self.claimed.contains(&name) {
            return Err(BuildError::DuplicateName(name));
        }

        if let Step::Invoke(Invoke::Selected { keys, .. }) = &step {
            if keys.is_empty() {
                return Err(BuildError::EmptySelection(name));
            }
        }

        // First missing dependency wins; observation steps have nothing to select
        if let Some(missing) = step
            .dependencies()
            .iter()
            .find(|dep| !self.claimed.contains(*dep) || self.observers.contains(*dep))
        {
            return Err(BuildError::UnknownDependency {
                missing: missing.clone(),
                step: name,
            });
        }

        debug!("Appending {} step '{}'", step.kind_name(), name);
        self.claimed.insert(name.clone());
        if matches!(step, Step::Observe(_)) {
            self.observers.insert(name.clone());
        }
        self.steps.push(Arc::new(Entry { name, step }));
        Ok(self)
    }

    /// Append a value step
    pub fn put(self, name: impl Into<K>, value: impl Into<V>) -> Result<Self, BuildError<K>> {
        self.then(name, Step::put(value))
    }

    /// Append a full-state invoke step
    pub fn invoke<F>(self, name: impl Into<K>, callable: F) -> Result<Self, BuildError<K>>
    where
        F: Fn(&Accumulator<K, V>) -> StepResult<V> + Send + Sync + 'static,
    {
        self.then(name, Step::invoke(callable))
    }

    /// Append an invoke step receiving the values of `keys`
    pub fn select<F, I>(self, name: impl Into<K>, keys: I, callable: F) -> Result<Self, BuildError<K>>
    where
        F: Fn(Vec<V>) -> StepResult<V> + Send + Sync + 'static,
        I: IntoIterator,
        I::Item: Into<K>,
    {
        self.then(name, Step::select(keys, callable))
    }

    /// Append an invoke step receiving selected values and extra arguments
    pub fn invoke_with<F, I>(
        self,
        name: impl Into<K>,
        keys: I,
        extra_args: Vec<V>,
        order: ArgOrder,
        callable: F,
    ) -> Result<Self, BuildError<K>>
    where
        F: Fn(Vec<V>) -> StepResult<V> + Send + Sync + 'static,
        I: IntoIterator,
        I::Item: Into<K>,
    {
        self.then(name, Step::invoke_with(keys, extra_args, order, callable))
    }

    /// Append an observation of the whole accumulator
    pub fn observe(self, name: impl Into<K>) -> Result<Self, BuildError<K>> {
        self.then(name, Step::observe())
    }

    /// Append an observation with explicit options
    pub fn observe_with(self, name: impl Into<K>, options: ObserveOptions<K>) -> Result<Self, BuildError<K>> {
        self.then(name, Step::observe_with(options))
    }

    /// Steps in insertion order
    pub fn to_ordered_list(&self) -> Vec<(&K, &Step<K, V>)> {
        self.iter().collect()
    }

    /// Iterate steps in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Step<K, V>)> {
        self.steps.iter().map(|entry| (&entry.name, &entry.step))
    }

    /// Step names in insertion order
    pub fn names(&self) -> Vec<&K> {
        self.steps.iter().map(|entry| &entry.name).collect()
    }

    /// Look up a step by name
    pub fn get(&self, name: &K) -> Option<&Step<K, V>> {
        self.steps
            .iter()
            .find(|entry| &entry.name == name)
            .map(|entry| &entry.step)
    }

    pub fn contains(&self, name: &K) -> bool {
        self.claimed.contains(name)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<K: StepKey, V> Default for StepSequence<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
