//! Pipeline execution engine

pub mod engine;
pub mod executor;
pub mod presenter;

pub use engine::{execute, EventHandler, ExecutionEngine, ExecutionEvent};
pub use executor::{shape_arguments, ExecutionResult, StepExecutor};
pub use presenter::{Presenter, TracingPresenter};
