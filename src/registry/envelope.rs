//! Tagged JSON envelopes returned by registry functions
//!
//! A registry function answers with exactly one of `{"ok": v}`,
//! `{"halt": v}` or `{"error": v}`. Anything else means the function is
//! miswired, and the run is aborted with a panic rather than reported as a
//! step failure.

use crate::core::StepResult;
use serde_json::{json, Value};
use tracing::error;

pub const OK: &str = "ok";
pub const HALT: &str = "halt";
pub const ERROR: &str = "error";

pub fn ok(value: Value) -> Value {
    json!({ "ok": value })
}

pub fn halt(value: Value) -> Value {
    json!({ "halt": value })
}

pub fn error(value: impl Into<Value>) -> Value {
    json!({ "error": value.into() })
}

/// Read an envelope, handing it back unchanged if it is malformed
pub fn parse(raw: Value) -> Result<StepResult<Value>, Value> {
    let mut map = match raw {
        Value::Object(map) if map.len() == 1 => map,
        other => return Err(other),
    };

    if let Some(value) = map.remove(OK) {
        Ok(StepResult::Ok(value))
    } else if let Some(value) = map.remove(HALT) {
        Ok(StepResult::Halt(value))
    } else if let Some(value) = map.remove(ERROR) {
        Ok(StepResult::Error(value))
    } else {
        Err(Value::Object(map))
    }
}

/// Classify the envelope a step returned
///
/// # Panics
///
/// Panics when the envelope is malformed. This is a defect in the function,
/// never a pipeline failure.
pub fn classify(step: &str, raw: Value) -> StepResult<Value> {
    match parse(raw) {
        Ok(result) => result,
        Err(malformed) => {
            error!("Step '{}' returned a malformed result: {}", step, malformed);
            panic!("step '{}' returned a malformed result: {}", step, malformed);
        }
    }
}
