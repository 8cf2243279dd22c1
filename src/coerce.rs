//! Lenient numeric coercion for loosely-typed telemetry fields
//!
//! Upstream records arrive as JSON where a number may be a number, a
//! numeric string, `null`, absent, or garbage. Sums treat anything
//! unintelligible as the default; averages use [`to_f64`] so that absent
//! values are excluded rather than counted as zero.

use serde_json::Value;

/// Interpret a JSON value as a finite float, if it is intelligible as one
pub fn to_f64(value: Option<&Value>) -> Option<f64> {
  let parsed = match value? {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  };
  parsed.filter(|v| v.is_finite())
}

/// Interpret a JSON value as an integer; floats are truncated toward zero
pub fn to_i64(value: Option<&Value>) -> Option<i64> {
  match value? {
    Value::Number(n) => n
      .as_i64()
      .or_else(|| n.as_f64().filter(|v| v.is_finite()).map(|v| v.trunc() as i64)),
    Value::String(s) => s.trim().parse::<i64>().ok(),
    _ => None,
  }
}

pub fn safe_float(value: Option<&Value>, default: f64) -> f64 {
  to_f64(value).unwrap_or(default)
}

pub fn safe_int(value: Option<&Value>, default: i64) -> i64 {
  to_i64(value).unwrap_or(default)
}

/// Round to a fixed number of decimal places for output projections
///
/// Exact ties go to the even digit (0.125 -> 0.12, 0.375 -> 0.38).
pub fn round_to(value: f64, decimals: i32) -> f64 {
  let factor = 10f64.powi(decimals);
  (value * factor).round_ties_even() / factor
}
