//! Step domain model

use crate::core::accumulator::Accumulator;
use regex::Regex;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use std::sync::Arc;

/// Identifier used both as the sequence key and the accumulator key.
pub trait StepKey: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static {}

impl<T> StepKey for T where T: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static {}

/// Payload produced by steps. The engine never looks inside it.
pub trait StepValue: Clone + Debug + Send + Sync + 'static {}

impl<T> StepValue for T where T: Clone + Debug + Send + Sync + 'static {}

/// What a step callable hands back to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult<V> {
    /// Record the value and continue with the next step
    Ok(V),
    /// Record the value and stop the pipeline successfully
    Halt(V),
    /// Stop the pipeline with a failure
    Error(V),
}

impl<V, E> From<Result<V, E>> for StepResult<V>
where
    E: Into<V>,
{
    fn from(result: Result<V, E>) -> Self {
        match result {
            Ok(v) => StepResult::Ok(v),
            Err(e) => StepResult::Error(e.into()),
        }
    }
}

/// Callable receiving the whole accumulator as its only argument
pub type FullStateFn<K, V> = Arc<dyn Fn(&Accumulator<K, V>) -> StepResult<V> + Send + Sync>;

/// Callable receiving positional arguments
pub type SelectedFn<V> = Arc<dyn Fn(Vec<V>) -> StepResult<V> + Send + Sync>;

/// Where the extra literal arguments go relative to the selected values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArgOrder {
    /// `selected ++ extra`
    #[default]
    Prepend,
    /// `extra ++ selected`
    Append,
}

/// The two calling conventions of an invoke step
#[derive(Clone)]
pub enum Invoke<K: StepKey, V> {
    /// The callable sees the entire accumulator
    FullState(FullStateFn<K, V>),
    /// The callable sees the values of `keys` plus `extra_args`
    Selected {
        callable: SelectedFn<V>,
        keys: Vec<K>,
        extra_args: Vec<V>,
        order: ArgOrder,
    },
}

impl<K: StepKey, V> Invoke<K, V> {
    /// Keys this invoke depends on (empty for full-state)
    pub fn selected_keys(&self) -> &[K] {
        match self {
            Invoke::FullState(_) => &[],
            Invoke::Selected { keys, .. } => keys,
        }
    }

    /// Number of positional arguments the callable will receive
    pub fn arity(&self) -> usize {
        match self {
            Invoke::FullState(_) => 1,
            Invoke::Selected { keys, extra_args, .. } => keys.len() + extra_args.len(),
        }
    }
}

impl<K: StepKey, V: Debug> Debug for Invoke<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invoke::FullState(_) => f.write_str("FullState(<fn>)"),
            Invoke::Selected { keys, extra_args, order, .. } => f
                .debug_struct("Selected")
                .field("keys", keys)
                .field("extra_args", extra_args)
                .field("order", order)
                .finish_non_exhaustive(),
        }
    }
}

/// Which accumulator entries an observation step shows
#[derive(Debug, Clone)]
pub enum KeyFilter<K> {
    /// Every entry
    All,
    /// Only the listed keys, missing ones are skipped
    Only(Vec<K>),
    /// Keys whose display form matches the pattern
    Matching(Regex),
}

impl<K: StepKey> KeyFilter<K> {
    /// Check whether a key passes the filter
    pub fn allows(&self, key: &K) -> bool {
        match self {
            KeyFilter::All => true,
            KeyFilter::Only(keys) => keys.contains(key),
            KeyFilter::Matching(regex) => regex.is_match(&key.to_string()),
        }
    }
}

/// Presentation options for an observation step
#[derive(Debug, Clone)]
pub struct ObserveOptions<K> {
    /// Free-form heading shown next to the snapshot
    pub label: Option<String>,

    /// Which entries to show
    pub filter: KeyFilter<K>,
}

impl<K> Default for ObserveOptions<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> ObserveOptions<K> {
    pub fn new() -> Self {
        Self {
            label: None,
            filter: KeyFilter::All,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_filter(mut self, filter: KeyFilter<K>) -> Self {
        self.filter = filter;
        self
    }
}

/// A single unit of work in a pipeline
#[derive(Clone)]
pub enum Step<K: StepKey, V> {
    /// A precomputed value, recorded as-is
    Put(V),
    /// A computation over earlier results
    Invoke(Invoke<K, V>),
    /// A pass-through inspection of the accumulator
    Observe(ObserveOptions<K>),
}

impl<K: StepKey, V> Step<K, V> {
    /// Inject a value verbatim
    pub fn put(value: impl Into<V>) -> Self {
        Step::Put(value.into())
    }

    /// Invoke a callable with the whole accumulator
    pub fn invoke<F>(callable: F) -> Self
    where
        F: Fn(&Accumulator<K, V>) -> StepResult<V> + Send + Sync + 'static,
    {
        Step::Invoke(Invoke::FullState(Arc::new(callable)))
    }

    /// Invoke a callable with the values of `keys`, in order
    pub fn select<F, I>(keys: I, callable: F) -> Self
    where
        F: Fn(Vec<V>) -> StepResult<V> + Send + Sync + 'static,
        I: IntoIterator,
        I::Item: Into<K>,
    {
        Self::invoke_with(keys, Vec::new(), ArgOrder::Prepend, callable)
    }

    /// Invoke a callable with selected values and extra literal arguments
    pub fn invoke_with<F, I>(keys: I, extra_args: Vec<V>, order: ArgOrder, callable: F) -> Self
    where
        F: Fn(Vec<V>) -> StepResult<V> + Send + Sync + 'static,
        I: IntoIterator,
        I::Item: Into<K>,
    {
        Step::Invoke(Invoke::Selected {
            callable: Arc::new(callable),
            keys: keys.into_iter().map(Into::into).collect(),
            extra_args,
            order,
        })
    }

    /// Observe the full accumulator
    pub fn observe() -> Self {
        Step::Observe(ObserveOptions::new())
    }

    /// Observe with explicit options
    pub fn observe_with(options: ObserveOptions<K>) -> Self {
        Step::Observe(options)
    }

    /// Names of earlier steps this one needs
    pub fn dependencies(&self) -> &[K] {
        match self {
            Step::Invoke(invoke) => invoke.selected_keys(),
            Step::Put(_) | Step::Observe(_) => &[],
        }
    }

    /// Short label for logs and output
    pub fn kind_name(&self) -> &'static str {
        match self {
            Step::Put(_) => "put",
            Step::Invoke(Invoke::FullState(_)) => "invoke",
            Step::Invoke(Invoke::Selected { .. }) => "invoke-selected",
            Step::Observe(_) => "observe",
        }
    }
}

impl<K: StepKey, V: Debug> Debug for Step<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Put(value) => f.debug_tuple("Put").field(value).finish(),
            Step::Invoke(invoke) => f.debug_tuple("Invoke").field(invoke).finish(),
            Step::Observe(options) => f.debug_tuple("Observe").field(options).finish(),
        }
    }
}
