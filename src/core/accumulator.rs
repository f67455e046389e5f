//! Accumulator - the named results of the steps run so far

use crate::core::step::{KeyFilter, StepKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Mapping from step name to the value that step produced
///
/// Built fresh for every execution. Steps only ever see it by shared
/// reference; the engine owns all writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Accumulator<K: StepKey, V> {
    entries: HashMap<K, V>,
}

impl<K: StepKey, V> Accumulator<K, V> {
    /// Create a new empty accumulator
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Get the value recorded under a step name
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries (no particular order)
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    /// Step names present, sorted by their display form
    pub fn keys_sorted(&self) -> Vec<&K> {
        let mut keys: Vec<&K> = self.entries.keys().collect();
        keys.sort_by_key(|k| k.to_string());
        keys
    }

    pub fn into_inner(self) -> HashMap<K, V> {
        self.entries
    }

    pub(crate) fn insert(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }
}

impl<K: StepKey, V: Clone> Accumulator<K, V> {
    /// Copy of the entries that pass the filter
    pub fn filtered(&self, filter: &KeyFilter<K>) -> Self {
        if matches!(filter, KeyFilter::All) {
            return self.clone();
        }

        let entries = self
            .entries
            .iter()
            .filter(|(k, _)| filter.allows(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self { entries }
    }
}

impl<K: StepKey, V> Default for Accumulator<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StepKey, V> FromIterator<(K, V)> for Accumulator<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<K: StepKey, V> From<HashMap<K, V>> for Accumulator<K, V> {
    fn from(entries: HashMap<K, V>) -> Self {
        Self { entries }
    }
}

impl<V: Serialize> Accumulator<String, V> {
    /// Render as a JSON object keyed by step name
    ///
    /// Values that cannot be represented as JSON are rendered as `null`
    /// and logged.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| {
                    let value = serde_json::to_value(v).unwrap_or_else(|e| {
                        warn!("Value of step '{}' cannot be rendered as JSON: {}", k, e);
                        serde_json::Value::Null
                    });
                    (k.clone(), value)
                })
                .collect(),
        )
    }
}
