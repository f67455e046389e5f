//! Summary of a pipeline run

use crate::core::{Outcome, OutcomeStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Summary of a pipeline execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Execution ID assigned by the engine
    pub execution_id: Option<Uuid>,

    /// Pipeline name
    pub pipeline_name: String,

    /// How the run ended
    pub status: OutcomeStatus,

    /// When execution started
    pub started_at: DateTime<Utc>,

    /// When execution finished
    pub completed_at: DateTime<Utc>,

    /// Number of steps in the pipeline
    pub total_steps: usize,

    /// Number of steps that recorded a value
    pub recorded_steps: usize,

    /// Name of the failing step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<String>,

    /// Error value of the failing step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,

    /// Recorded results; `null` when the pipeline had no steps
    pub results: Value,
}

impl RunReport {
    /// Create a report from an outcome
    pub fn new(
        pipeline_name: &str,
        execution_id: Option<Uuid>,
        total_steps: usize,
        started_at: DateTime<Utc>,
        outcome: &Outcome<String, Value>,
    ) -> Self {
        let failure = outcome.failure();
        let accumulator = outcome.accumulator();

        RunReport {
            execution_id,
            pipeline_name: pipeline_name.to_string(),
            status: outcome.status(),
            started_at,
            completed_at: Utc::now(),
            total_steps,
            recorded_steps: accumulator.map(|acc| acc.len()).unwrap_or(0),
            failed_step: failure.map(|f| f.step.clone()),
            error: failure.map(|f| f.error.clone()),
            results: accumulator.map(|acc| acc.to_json()).unwrap_or(Value::Null),
        }
    }

    /// Duration of the run
    pub fn duration(&self) -> chrono::Duration {
        self.completed_at.signed_duration_since(self.started_at)
    }
}
