//! Built-in step functions

use crate::registry::envelope::{error, halt, ok};
use serde_json::{Map, Number, Value};

/// Name, description and implementation of every built-in
pub(crate) const BUILTINS: &[(&str, &str, fn(&[Value]) -> Value)] = &[
    ("identity", "Return the single argument, or all arguments as an array", identity),
    ("collect", "Return all arguments as an array", collect),
    ("sum", "Add numeric arguments", sum),
    ("product", "Multiply numeric arguments", product),
    ("concat", "Join strings, or concatenate arrays", concat),
    ("merge", "Merge objects left to right", merge),
    ("keys", "Sorted keys of an object argument", keys),
    ("check", "Pass the first argument through if truthy, otherwise fail with the second", check),
    ("halt", "Stop the pipeline successfully with the first argument", halt_with),
    ("fail", "Fail the pipeline with the first argument", fail_with),
];

pub fn identity(args: &[Value]) -> Value {
    match args {
        [single] => ok(single.clone()),
        _ => collect(args),
    }
}

pub fn collect(args: &[Value]) -> Value {
    ok(Value::Array(args.to_vec()))
}

pub fn sum(args: &[Value]) -> Value {
    fold_numbers("sum", args, 0, 0.0, |a, b| a.checked_add(b), |a, b| a + b)
}

pub fn product(args: &[Value]) -> Value {
    fold_numbers("product", args, 1, 1.0, |a, b| a.checked_mul(b), |a, b| a * b)
}

/// Integers stay integers until one argument is fractional or the result
/// overflows, then the fold continues in floating point.
fn fold_numbers(
    name: &str,
    args: &[Value],
    int_start: i64,
    float_start: f64,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Value {
    let mut int_acc = Some(int_start);
    let mut float_acc = float_start;

    for (i, arg) in args.iter().enumerate() {
        let Value::Number(n) = arg else {
            return error(format!("{}: argument {} is not a number: {}", name, i + 1, arg));
        };
        float_acc = float_op(float_acc, n.as_f64().unwrap_or(f64::NAN));
        int_acc = match (int_acc, n.as_i64()) {
            (Some(acc), Some(v)) => int_op(acc, v),
            _ => None,
        };
    }

    match int_acc {
        Some(v) => ok(Value::from(v)),
        None => match Number::from_f64(float_acc) {
            Some(n) => ok(Value::Number(n)),
            None => error(format!("{}: result is not a finite number", name)),
        },
    }
}

pub fn concat(args: &[Value]) -> Value {
    if args.iter().all(Value::is_array) {
        let joined = args
            .iter()
            .filter_map(Value::as_array)
            .flat_map(|a| a.iter().cloned())
            .collect();
        return ok(Value::Array(joined));
    }

    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        match arg {
            Value::String(s) => out.push_str(s),
            Value::Number(n) => out.push_str(&n.to_string()),
            other => {
                return error(format!("concat: argument {} cannot be joined: {}", i + 1, other));
            }
        }
    }
    ok(Value::String(out))
}

pub fn merge(args: &[Value]) -> Value {
    let mut merged = Map::new();
    for (i, arg) in args.iter().enumerate() {
        match arg {
            Value::Object(map) => merged.extend(map.iter().map(|(k, v)| (k.clone(), v.clone()))),
            other => return error(format!("merge: argument {} is not an object: {}", i + 1, other)),
        }
    }
    ok(Value::Object(merged))
}

pub fn keys(args: &[Value]) -> Value {
    match args {
        [Value::Object(map)] => {
            let mut names: Vec<&String> = map.keys().collect();
            names.sort();
            ok(names.into_iter().map(|k| Value::String(k.clone())).collect())
        }
        _ => error("keys: expected a single object argument"),
    }
}

pub fn check(args: &[Value]) -> Value {
    match args {
        [] => error("check: missing condition"),
        [condition, rest @ ..] => {
            if is_truthy(condition) {
                ok(condition.clone())
            } else {
                let message = rest
                    .first()
                    .cloned()
                    .unwrap_or_else(|| Value::String("check failed".to_string()));
                error(message)
            }
        }
    }
}

pub fn halt_with(args: &[Value]) -> Value {
    halt(args.first().cloned().unwrap_or(Value::Null))
}

pub fn fail_with(args: &[Value]) -> Value {
    error(
        args.first()
            .cloned()
            .unwrap_or_else(|| Value::String("failed".to_string())),
    )
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
