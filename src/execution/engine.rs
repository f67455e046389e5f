//! Main execution engine - runs a whole step sequence

use crate::core::{Accumulator, Failure, Outcome, OutcomeStatus, StepKey, StepSequence, StepValue};
use crate::execution::{
    executor::{ExecutionResult, StepExecutor},
    presenter::{Presenter, TracingPresenter},
};
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

/// Events that can occur during pipeline execution
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionEvent<K> {
    PipelineStarted {
        execution_id: Uuid,
        steps: usize,
    },
    StepStarted {
        step: K,
        kind: &'static str,
    },
    StepCompleted {
        step: K,
    },
    StepObserved {
        step: K,
    },
    StepHalted {
        step: K,
    },
    StepFailed {
        step: K,
    },
    PipelineFinished {
        execution_id: Uuid,
        status: OutcomeStatus,
    },
}

/// Type for event handlers
pub type EventHandler<K> = Arc<dyn Fn(&ExecutionEvent<K>) + Send + Sync>;

/// Runs step sequences
///
/// The engine holds no per-run state, so one instance can execute any number
/// of sequences, from any number of threads.
pub struct ExecutionEngine<K: StepKey, V: StepValue> {
    executor: StepExecutor<K, V>,
    event_handlers: Vec<EventHandler<K>>,
}

impl<K: StepKey, V: StepValue> ExecutionEngine<K, V> {
    /// Create an engine that logs observation steps through `tracing`
    pub fn new() -> Self {
        Self::with_presenter(TracingPresenter)
    }

    /// Create an engine with a custom presenter for observation steps
    pub fn with_presenter<P: Presenter<K, V> + 'static>(presenter: P) -> Self {
        Self {
            executor: StepExecutor::new(Arc::new(presenter)),
            event_handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&ExecutionEvent<K>) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    fn emit(&self, event: ExecutionEvent<K>) {
        for handler in &self.event_handlers {
            handler(&event);
        }
    }

    /// Execute a sequence from an empty accumulator
    pub fn execute(&self, sequence: &StepSequence<K, V>) -> Outcome<K, V> {
        let execution_id = Uuid::new_v4();
        let span = info_span!("pipeline", %execution_id);
        let _guard = span.enter();

        info!("Starting pipeline with {} step(s)", sequence.len());
        self.emit(ExecutionEvent::PipelineStarted {
            execution_id,
            steps: sequence.len(),
        });

        let outcome = self.run(sequence);

        match &outcome {
            Outcome::Success(_) => info!("Pipeline completed"),
            Outcome::Halted(_) => info!("Pipeline halted early"),
            Outcome::Failed(failure) => warn!("Pipeline failed at step {}", failure.step),
        }
        self.emit(ExecutionEvent::PipelineFinished {
            execution_id,
            status: outcome.status(),
        });

        outcome
    }

    fn run(&self, sequence: &StepSequence<K, V>) -> Outcome<K, V> {
        if sequence.is_empty() {
            return Outcome::Success(None);
        }

        let mut acc = Accumulator::new();

        for (name, step) in sequence.iter() {
            debug!("Running {} step {}", step.kind_name(), name);
            self.emit(ExecutionEvent::StepStarted {
                step: name.clone(),
                kind: step.kind_name(),
            });

            match self.executor.execute(name, step, &acc) {
                ExecutionResult::Observed => {
                    self.emit(ExecutionEvent::StepObserved { step: name.clone() });
                }
                ExecutionResult::Completed(value) => {
                    acc.insert(name.clone(), value);
                    self.emit(ExecutionEvent::StepCompleted { step: name.clone() });
                }
                ExecutionResult::Halted(value) => {
                    info!("Step {} halted the pipeline", name);
                    acc.insert(name.clone(), value);
                    self.emit(ExecutionEvent::StepHalted { step: name.clone() });
                    return Outcome::Halted(acc);
                }
                ExecutionResult::Failed(error) => {
                    warn!("Step {} failed: {:?}", name, error);
                    self.emit(ExecutionEvent::StepFailed { step: name.clone() });
                    return Outcome::Failed(Failure {
                        step: name.clone(),
                        error,
                        context: acc,
                    });
                }
            }
        }

        Outcome::Success(Some(acc))
    }
}

impl<K: StepKey, V: StepValue> Default for ExecutionEngine<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Execute a sequence with a default engine
pub fn execute<K: StepKey, V: StepValue>(sequence: &StepSequence<K, V>) -> Outcome<K, V> {
    ExecutionEngine::new().execute(sequence)
}
