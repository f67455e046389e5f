//! Test: Observation - snapshots are shown but never change the run

use crate::helpers::*;
use regex::Regex;
use serde_json::json;
use stepwise::core::{KeyFilter, ObserveOptions, StepResult};

/// Observers see the accumulator as it stands and record nothing
#[test]
fn test_observe_shows_snapshot_without_recording() {
    let seq = Seq::new()
        .put("a", json!(1))
        .unwrap()
        .observe("peek")
        .unwrap()
        .put("b", json!(2))
        .unwrap();

    let result = run_scenario(&seq);

    let snapshots = result.presenter.snapshots();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].0, "peek");
    assert_eq!(snapshots[0].2, acc(&[("a", json!(1))]));
    assert_completed(&result, &acc(&[("a", json!(1)), ("b", json!(2))]));
}

/// Filters and labels shape only what is shown
#[test]
fn test_observe_filters_and_labels() {
    let seq = Seq::new()
        .put("total", json!(10))
        .unwrap()
        .put("subtotal", json!(8))
        .unwrap()
        .put("note", json!("hi"))
        .unwrap()
        .observe_with(
            "totals",
            ObserveOptions::new()
                .with_label("money")
                .with_filter(KeyFilter::Matching(Regex::new("total$").unwrap())),
        )
        .unwrap()
        .observe_with(
            "note_only",
            ObserveOptions::new().with_filter(KeyFilter::Only(vec!["note".to_string()])),
        )
        .unwrap();

    let result = run_scenario(&seq);

    let snapshots = result.presenter.snapshots();
    assert_eq!(snapshots[0].1.as_deref(), Some("money"));
    assert_eq!(snapshots[0].2, acc(&[("total", json!(10)), ("subtotal", json!(8))]));
    assert_eq!(snapshots[1].1, None);
    assert_eq!(snapshots[1].2, acc(&[("note", json!("hi"))]));
    assert_eq!(result.outcome.accumulator().map(|a| a.len()), Some(3));
}

/// A pipeline of observers alone completes with an empty accumulator
#[test]
fn test_observers_only() {
    let seq = Seq::new().observe("first").unwrap().observe("second").unwrap();

    let result = run_scenario(&seq);

    assert_completed(&result, &acc(&[]));
    assert_eq!(result.presenter.snapshots().len(), 2);
}

/// An observer's name cannot be selected because it never holds a value
#[test]
fn test_observer_cannot_be_selected() {
    let err = Seq::new()
        .observe("peek")
        .unwrap()
        .select("f", ["peek"], |args| StepResult::Ok(json!(args)))
        .unwrap_err();

    assert_eq!(err.to_string(), "Step 'f' depends on unknown step 'peek'");
}
