//! Presentation of observation steps

use crate::core::{Accumulator, ObserveOptions, StepKey, StepValue};
use tracing::info;

/// Receives the accumulator snapshot of every observation step
///
/// Presenters are for diagnostics only; they cannot influence the run.
pub trait Presenter<K: StepKey, V: StepValue>: Send + Sync {
    fn present(&self, step: &K, snapshot: &Accumulator<K, V>, options: &ObserveOptions<K>);
}

impl<K, V, F> Presenter<K, V> for F
where
    K: StepKey,
    V: StepValue,
    F: Fn(&K, &Accumulator<K, V>, &ObserveOptions<K>) + Send + Sync,
{
    fn present(&self, step: &K, snapshot: &Accumulator<K, V>, options: &ObserveOptions<K>) {
        self(step, snapshot, options)
    }
}

/// Logs snapshots through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPresenter;

impl<K: StepKey, V: StepValue> Presenter<K, V> for TracingPresenter {
    fn present(&self, step: &K, snapshot: &Accumulator<K, V>, options: &ObserveOptions<K>) {
        let label = options.label.as_deref().unwrap_or("snapshot");
        let entries: Vec<String> = snapshot
            .keys_sorted()
            .into_iter()
            .filter_map(|k| snapshot.get(k).map(|v| format!("{} = {:?}", k, v)))
            .collect();
        info!("[{}] {}: {{{}}}", step, label, entries.join(", "));
    }
}
