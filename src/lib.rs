//! stepwise - a sequential pipeline engine that keeps every named step result

pub mod cli;
pub mod core;
pub mod execution;
pub mod registry;

// Re-export commonly used types
pub use self::core::{Accumulator, ArgOrder, BuildError, Failure, Outcome, OutcomeStatus, Step, StepResult, StepSequence};
pub use self::core::{Invoke, KeyFilter, ObserveOptions, StepKey, StepValue};
pub use execution::{execute, ExecutionEngine, ExecutionEvent, Presenter, TracingPresenter};
pub use registry::FunctionRegistry;
