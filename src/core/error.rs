//! Build-time errors

use crate::core::step::StepKey;
use thiserror::Error;

/// Rejections raised while appending a step to a sequence
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError<K: StepKey> {
    #[error("Duplicate step name: {0}")]
    DuplicateName(K),

    #[error("Step '{step}' depends on unknown step '{missing}'")]
    UnknownDependency { step: K, missing: K },

    #[error("Step '{0}' selects no keys; use a full-state invoke to receive the whole accumulator")]
    EmptySelection(K),
}

impl<K: StepKey> BuildError<K> {
    /// The name of the step whose append was rejected
    pub fn step(&self) -> &K {
        match self {
            BuildError::DuplicateName(step)
            | BuildError::UnknownDependency { step, .. }
            | BuildError::EmptySelection(step) => step,
        }
    }
}
