//! Test: Building - names, dependencies and ordering are checked up front

use crate::helpers::*;
use serde_json::json;
use stepwise::core::{BuildError, Step, StepResult};
use stepwise::execution::{execute, ExecutionEngine};
use stepwise::Outcome;

/// The empty pipeline has no result at all
#[test]
fn test_empty_pipeline_returns_none() {
    let result = run_scenario(&Seq::new());

    assert!(matches!(result.outcome, Outcome::Success(None)));
    assert!(result.started_steps().is_empty());
}

/// A name can be claimed once, whatever kind of step claimed it
#[test]
fn test_duplicate_names_are_rejected() {
    let seq = Seq::new().put("a", json!(1)).unwrap();

    assert_eq!(
        seq.append("a", Step::put(json!(2))).unwrap_err(),
        BuildError::DuplicateName("a".to_string())
    );

    let seq = seq.observe("peek").unwrap();
    assert!(matches!(
        seq.append("peek", Step::observe()),
        Err(BuildError::DuplicateName(name)) if name == "peek"
    ));
}

/// Dependencies must name earlier steps; the first missing one is reported
#[test]
fn test_unknown_dependency_is_rejected() {
    let seq = Seq::new().put("a", json!(1)).unwrap();

    let err = seq
        .append("f", Step::select(["a", "later", "other"], |args: Vec<serde_json::Value>| StepResult::Ok(json!(args))))
        .unwrap_err();

    assert_eq!(
        err,
        BuildError::UnknownDependency {
            step: "f".to_string(),
            missing: "later".to_string(),
        }
    );
    assert_eq!(err.step(), "f");
}

/// A step cannot select itself
#[test]
fn test_self_dependency_is_rejected() {
    let err = Seq::new()
        .select("f", ["f"], |args| StepResult::Ok(json!(args)))
        .unwrap_err();

    assert!(matches!(err, BuildError::UnknownDependency { missing, .. } if missing == "f"));
}

/// A rejected append leaves the original sequence usable
#[test]
fn test_failed_append_keeps_sequence() {
    let seq = Seq::new().put("a", json!(1)).unwrap();
    assert!(seq.append("a", Step::put(json!(2))).is_err());

    let seq = seq.append("b", Step::put(json!(2))).unwrap();
    assert_eq!(seq.names(), vec!["a", "b"]);
}

/// Branching from a shared prefix gives independent pipelines
#[test]
fn test_branches_share_prefix() {
    let base = Seq::new().put("a", json!(1)).unwrap();
    let left = base.append("l", Step::put(json!("left"))).unwrap();
    let right = base.append("r", Step::put(json!("right"))).unwrap();

    assert_eq!(base.len(), 1);
    assert!(!left.contains(&"r".to_string()));

    let engine = ExecutionEngine::new();
    assert_eq!(
        engine.execute(&left).into_result().unwrap(),
        Some(acc(&[("a", json!(1)), ("l", json!("left"))]))
    );
    assert_eq!(
        engine.execute(&right).into_result().unwrap(),
        Some(acc(&[("a", json!(1)), ("r", json!("right"))]))
    );
}

/// Listing a sequence and appending the entries again rebuilds it exactly
#[test]
fn test_ordered_list_round_trip() {
    let original = Seq::new()
        .put("a", json!(1))
        .unwrap()
        .select("b", ["a"], |args| StepResult::Ok(json!(args)))
        .unwrap()
        .observe("peek")
        .unwrap();

    let mut rebuilt = Seq::new();
    for (name, step) in original.to_ordered_list() {
        rebuilt = rebuilt.append(name.clone(), step.clone()).unwrap();
    }

    assert_eq!(rebuilt.names(), original.names());
    assert_eq!(execute(&rebuilt), execute(&original));
}

/// Re-running the same sequence starts from scratch every time
#[test]
fn test_runs_are_independent() {
    let log = CallLog::new();
    let seq = Seq::new()
        .put("a", json!(1))
        .unwrap()
        .select("f", ["a"], log.collecting("f"))
        .unwrap();

    let first = run_scenario(&seq);
    let second = run_scenario(&seq);

    assert_eq!(first.outcome, second.outcome);
    assert_eq!(log.calls_to("f").len(), 2);
}
