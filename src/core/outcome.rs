//! Execution outcome models

use crate::core::accumulator::Accumulator;
use crate::core::step::{StepKey, StepValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Terminal status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// Every step ran
    Completed,
    /// A step asked to stop early
    Halted,
    /// A step returned an error
    Failed,
}

impl OutcomeStatus {
    /// Halted runs count as successful
    pub fn is_success(&self) -> bool {
        !matches!(self, OutcomeStatus::Failed)
    }
}

/// A step failure together with everything computed before it
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Step '{step}' failed: {error:?}")]
pub struct Failure<K: StepKey, V: StepValue> {
    /// Name of the failing step
    pub step: K,

    /// The error value the step returned
    pub error: V,

    /// Results of the steps that ran before the failing one
    pub context: Accumulator<K, V>,
}

/// Result of executing a sequence
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<K: StepKey, V: StepValue> {
    /// All steps completed. `None` only when the sequence had no steps.
    Success(Option<Accumulator<K, V>>),

    /// A step halted the run; includes the halting step's value
    Halted(Accumulator<K, V>),

    /// A step failed
    Failed(Failure<K, V>),
}

impl<K: StepKey, V: StepValue> Outcome<K, V> {
    pub fn status(&self) -> OutcomeStatus {
        match self {
            Outcome::Success(_) => OutcomeStatus::Completed,
            Outcome::Halted(_) => OutcomeStatus::Halted,
            Outcome::Failed(_) => OutcomeStatus::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status().is_success()
    }

    /// The accumulator as the run left it, whichever way it ended
    pub fn accumulator(&self) -> Option<&Accumulator<K, V>> {
        match self {
            Outcome::Success(acc) => acc.as_ref(),
            Outcome::Halted(acc) => Some(acc),
            Outcome::Failed(failure) => Some(&failure.context),
        }
    }

    pub fn failure(&self) -> Option<&Failure<K, V>> {
        match self {
            Outcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Collapse into a `Result`, reporting halts through the success channel
    pub fn into_result(self) -> Result<Option<Accumulator<K, V>>, Failure<K, V>> {
        match self {
            Outcome::Success(acc) => Ok(acc),
            Outcome::Halted(acc) => Ok(Some(acc)),
            Outcome::Failed(failure) => Err(failure),
        }
    }
}
