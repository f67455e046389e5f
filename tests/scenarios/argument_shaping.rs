//! Test: Argument Shaping - selected values, extra arguments and their order

use crate::helpers::*;
use serde_json::{json, Value};
use stepwise::core::{ArgOrder, StepResult};

fn two_inputs() -> Seq {
    Seq::new().put("a", json!(1)).unwrap().put("b", json!(2)).unwrap()
}

/// Selected values come before extra arguments by default
#[test]
fn test_prepend_puts_selected_values_first() {
    let log = CallLog::new();
    let seq = two_inputs()
        .invoke_with("f", ["a", "b"], vec![json!(9)], ArgOrder::default(), log.collecting("f"))
        .unwrap();

    let result = run_scenario(&seq);

    assert_eq!(log.calls_to("f"), vec![vec![json!(1), json!(2), json!(9)]]);
    assert_completed(&result, &acc(&[("a", json!(1)), ("b", json!(2)), ("f", json!([1, 2, 9]))]));
}

/// Append order places extra arguments in front of the selected values
#[test]
fn test_append_puts_extra_args_first() {
    let log = CallLog::new();
    let seq = two_inputs()
        .invoke_with("f", ["a", "b"], vec![json!(9)], ArgOrder::Append, log.collecting("f"))
        .unwrap();

    run_scenario(&seq);

    assert_eq!(log.calls_to("f"), vec![vec![json!(9), json!(1), json!(2)]]);
}

/// Selected values arrive in selection order, not insertion order
#[test]
fn test_selection_order_is_respected() {
    let log = CallLog::new();
    let seq = two_inputs().select("f", ["b", "a", "b"], log.collecting("f")).unwrap();

    run_scenario(&seq);

    assert_eq!(log.calls_to("f"), vec![vec![json!(2), json!(1), json!(2)]]);
}

/// Without a selection the callable sees the whole accumulator
#[test]
fn test_full_state_invoke_sees_everything() {
    let seen = std::sync::Arc::new(std::sync::Mutex::new(None));
    let sink = seen.clone();
    let seq = two_inputs()
        .invoke("f", move |state: &Acc| {
            *sink.lock().unwrap() = Some(state.clone());
            StepResult::Ok(json!(state.len()))
        })
        .unwrap();

    let result = run_scenario(&seq);

    assert_eq!(*seen.lock().unwrap(), Some(acc(&[("a", json!(1)), ("b", json!(2))])));
    assert_completed(&result, &acc(&[("a", json!(1)), ("b", json!(2)), ("f", json!(2))]));
}

/// Each invoke sees only what ran before it
#[test]
fn test_later_steps_see_earlier_results() {
    let log = CallLog::new();
    let seq = Seq::new()
        .put("x", json!(3))
        .unwrap()
        .select(
            "double",
            ["x"],
            log.responding("double", |args: Vec<Value>| {
                StepResult::Ok(json!(args[0].as_i64().unwrap_or(0) * 2))
            }),
        )
        .unwrap()
        .select("pair", ["x", "double"], log.collecting("pair"))
        .unwrap();

    let result = run_scenario(&seq);

    assert_eq!(log.calls_to("pair"), vec![vec![json!(3), json!(6)]]);
    assert_execution_order(&result, &["x", "double", "pair"]);
}
