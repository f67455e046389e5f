//! Test: Short Circuit - the first error stops the pipeline

use crate::helpers::*;
use serde_json::json;
use stepwise::core::{Outcome, StepResult};
use stepwise::execution::ExecutionEvent;

/// An error is reported with the step name and the results before it
#[test]
fn test_error_stops_at_failing_step() {
    let log = CallLog::new();
    let seq = Seq::new()
        .put("a", json!(1))
        .unwrap()
        .select("b", ["a"], log.responding("b", |_| StepResult::Error(json!("x"))))
        .unwrap()
        .select("c", ["a"], log.collecting("c"))
        .unwrap();

    let result = run_scenario(&seq);

    assert_failed_at(&result, "b", &json!("x"), &acc(&[("a", json!(1))]));
    assert!(log.was_called("b"));
    assert!(!log.was_called("c"), "step after the failure must not run");
    assert_execution_order(&result, &["a", "b"]);
}

/// The failing step's own value is never recorded
#[test]
fn test_failing_step_records_nothing() {
    let seq = Seq::new()
        .invoke("boom", |_: &Acc| StepResult::Error(json!({"code": 7})))
        .unwrap();

    let result = run_scenario(&seq);

    let failure = result.outcome.failure().expect("expected a failure");
    assert_eq!(failure.error, json!({"code": 7}));
    assert!(failure.context.is_empty());
}

/// Failures surface as `Err` when collapsed into a `Result`
#[test]
fn test_failure_into_result() {
    let seq = Seq::new()
        .put("a", json!(1))
        .unwrap()
        .invoke("b", |_: &Acc| Err::<serde_json::Value, _>("nope").into())
        .unwrap();

    let failure = run_scenario(&seq).outcome.into_result().unwrap_err();
    assert_eq!(failure.step, "b");
    assert_eq!(failure.error, json!("nope"));
    assert_eq!(failure.to_string(), "Step 'b' failed: String(\"nope\")");
}

/// Observers after a failure are never shown anything
#[test]
fn test_observer_after_failure_does_not_run() {
    let seq = Seq::new()
        .invoke("bad", |_: &Acc| StepResult::Error(json!("x")))
        .unwrap()
        .observe("peek")
        .unwrap();

    let result = run_scenario(&seq);

    assert!(matches!(result.outcome, Outcome::Failed(_)));
    assert!(result.presenter.snapshots().is_empty());
    assert!(result
        .events
        .iter()
        .any(|e| matches!(e, ExecutionEvent::StepFailed { step } if step == "bad")));
}
