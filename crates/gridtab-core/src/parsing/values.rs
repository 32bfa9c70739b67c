use chrono::{NaiveDateTime, Timelike};
use serde_json::{Number, Value};

use crate::model::CellValue;

/// Formula results nested deeper than this render as empty.
pub const MAX_FORMULA_DEPTH: usize = 8;

/// Largest integer magnitude a JSON consumer can hold exactly in a double.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Render a cell value as display text for markdown and header labels.
///
/// - Number(100.0) -> "100", Number(0.25) -> "0.25"
/// - DateTime at midnight -> "2024-03-01", otherwise "2024-03-01T08:30:00"
/// - FormulaResult -> its cached result, or the formula text when none was cached
/// - Empty -> ""
pub fn display_value(value: &CellValue) -> String {
    display_at_depth(value, 0)
}

fn display_at_depth(value: &CellValue, depth: usize) -> String {
    match value {
        CellValue::Number(n) => format_number(*n),
        CellValue::Text(s) => s.clone(),
        CellValue::Boolean(b) => b.to_string(),
        CellValue::DateTime(dt) => format_datetime(dt, true),
        CellValue::FormulaResult { formula, result } => {
            if depth >= MAX_FORMULA_DEPTH {
                return String::new();
            }
            match result {
                Some(inner) => display_at_depth(inner, depth + 1),
                None => formula.clone(),
            }
        }
        CellValue::Empty => String::new(),
    }
}

/// Convert a cell value into the JSON value used by row projections.
pub fn json_value(value: &CellValue) -> Value {
    json_at_depth(value, 0)
}

fn json_at_depth(value: &CellValue, depth: usize) -> Value {
    match value {
        CellValue::Number(n) => number_to_json(*n),
        CellValue::Text(s) => Value::String(s.clone()),
        CellValue::Boolean(b) => Value::Bool(*b),
        CellValue::DateTime(dt) => Value::String(format_datetime(dt, false)),
        CellValue::FormulaResult { result, .. } => match result {
            Some(inner) if depth < MAX_FORMULA_DEPTH => json_at_depth(inner, depth + 1),
            _ => Value::Null,
        },
        CellValue::Empty => Value::Null,
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn format_datetime(dt: &NaiveDateTime, short_midnight: bool) -> String {
    if short_midnight && dt.time().num_seconds_from_midnight() == 0 && dt.nanosecond() == 0 {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}
