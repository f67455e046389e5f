//! Step executor - runs a single step against the accumulator

use crate::core::{Accumulator, ArgOrder, Invoke, Step, StepKey, StepResult, StepValue};
use crate::execution::presenter::Presenter;
use std::sync::Arc;
use tracing::debug;

/// Result of executing one step
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult<V> {
    /// Step produced a value, continue
    Completed(V),
    /// Step produced a value and asked to stop
    Halted(V),
    /// Step failed with this error value
    Failed(V),
    /// Observation only, nothing to record
    Observed,
}

impl<V> From<StepResult<V>> for ExecutionResult<V> {
    fn from(result: StepResult<V>) -> Self {
        match result {
            StepResult::Ok(v) => ExecutionResult::Completed(v),
            StepResult::Halt(v) => ExecutionResult::Halted(v),
            StepResult::Error(v) => ExecutionResult::Failed(v),
        }
    }
}

/// Build the positional arguments of a selected invoke
///
/// # Panics
///
/// Panics if a key has no recorded value. Sequences only accept keys of
/// earlier value-producing steps, and a run stops at the first step that
/// does not record, so this cannot happen for a sequence built through
/// `StepSequence`.
pub fn shape_arguments<K: StepKey, V: StepValue>(
    step: &K,
    acc: &Accumulator<K, V>,
    keys: &[K],
    extra_args: &[V],
    order: ArgOrder,
) -> Vec<V> {
    let selected = keys.iter().map(|key| {
        acc.get(key)
            .cloned()
            .unwrap_or_else(|| panic!("step '{}' selected '{}' which has no recorded value", step, key))
    });

    match order {
        ArgOrder::Prepend => selected.chain(extra_args.iter().cloned()).collect(),
        ArgOrder::Append => extra_args.iter().cloned().chain(selected).collect(),
    }
}

/// Executes a single step
pub struct StepExecutor<K: StepKey, V: StepValue> {
    presenter: Arc<dyn Presenter<K, V>>,
}

impl<K: StepKey, V: StepValue> StepExecutor<K, V> {
    pub fn new(presenter: Arc<dyn Presenter<K, V>>) -> Self {
        Self { presenter }
    }

    /// Execute a step and return the result
    pub fn execute(&self, name: &K, step: &Step<K, V>, acc: &Accumulator<K, V>) -> ExecutionResult<V> {
        match step {
            Step::Observe(options) => {
                let snapshot = acc.filtered(&options.filter);
                self.presenter.present(name, &snapshot, options);
                ExecutionResult::Observed
            }
            Step::Put(value) => ExecutionResult::Completed(value.clone()),
            Step::Invoke(Invoke::FullState(callable)) => {
                debug!("Invoking step {} with the full accumulator ({} entries)", name, acc.len());
                callable(acc).into()
            }
            Step::Invoke(Invoke::Selected {
                callable,
                keys,
                extra_args,
                order,
            }) => {
                let args = shape_arguments(name, acc, keys, extra_args, *order);
                debug!("Invoking step {} with {} argument(s)", name, args.len());
                callable(args).into()
            }
        }
    }
}
