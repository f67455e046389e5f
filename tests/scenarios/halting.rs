//! Test: Halting - a step can end the pipeline early and successfully

use crate::helpers::*;
use serde_json::json;
use stepwise::core::{OutcomeStatus, StepResult};
use stepwise::execution::ExecutionEvent;

/// A halt records its value and skips the remaining steps
#[test]
fn test_halt_records_value_and_stops() {
    let log = CallLog::new();
    let seq = Seq::new()
        .invoke("a", |_: &Acc| StepResult::Halt(json!(5)))
        .unwrap()
        .select("b", ["a"], log.collecting("b"))
        .unwrap();

    let result = run_scenario(&seq);

    assert_halted(&result, &acc(&[("a", json!(5))]));
    assert!(!log.was_called("b"), "step after the halt must not run");
    assert_execution_order(&result, &["a"]);
}

/// A halted run is still a success
#[test]
fn test_halt_is_success() {
    let seq = Seq::new()
        .put("a", json!(1))
        .unwrap()
        .invoke("stop", |_: &Acc| StepResult::Halt(json!("done")))
        .unwrap()
        .invoke("never", |_: &Acc| StepResult::Error(json!("unreachable")))
        .unwrap();

    let result = run_scenario(&seq);

    assert_eq!(result.outcome.status(), OutcomeStatus::Halted);
    assert!(result.outcome.is_success());
    assert!(matches!(
        result.events.last(),
        Some(ExecutionEvent::PipelineFinished { status: OutcomeStatus::Halted, .. })
    ));

    let acc_out = result.outcome.into_result().unwrap();
    assert_eq!(acc_out, Some(acc(&[("a", json!(1)), ("stop", json!("done"))])));
}

/// Halting on the last step looks like completion apart from the status
#[test]
fn test_halt_on_last_step() {
    let seq = Seq::new()
        .put("a", json!(1))
        .unwrap()
        .invoke("last", |_: &Acc| StepResult::Halt(json!(2)))
        .unwrap();

    let result = run_scenario(&seq);

    assert_halted(&result, &acc(&[("a", json!(1)), ("last", json!(2))]));
}
