use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::to_f64;
use crate::dates::parse_date;

/// A daily recovery entry: a date plus a nested sleep block
///
/// Shape: `{"date": "...", "sleep": {"resting_heart_rate": 52, "duration": {"total": 7.5}}}`.
/// Any part may be missing; accessors return `None` for absent, zero or
/// non-numeric values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecoveryRecord(Value);

impl RecoveryRecord {
  pub fn new(raw: Value) -> Self {
    Self(raw)
  }

  pub fn raw(&self) -> &Value {
    &self.0
  }

  pub fn date(&self) -> Option<NaiveDate> {
    self.0.get("date").and_then(Value::as_str).and_then(parse_date)
  }

  fn sleep(&self) -> Option<&Value> {
    self.0.get("sleep")
  }

  pub fn resting_heart_rate(&self) -> Option<f64> {
    let rhr = self.sleep().and_then(|s| s.get("resting_heart_rate"));
    to_f64(rhr).filter(|v| *v > 0.0)
  }

  /// A resting heart rate was reported but cannot be read as a number
  ///
  /// Such an entry is unreliable as a whole and is left out of the weekly
  /// averages entirely, sleep included. Empty-ish values (`null`, `0`, `""`)
  /// count as not reported.
  pub fn has_unreadable_resting_heart_rate(&self) -> bool {
    let Some(rhr) = self.sleep().and_then(|s| s.get("resting_heart_rate")) else {
      return false;
    };
    let reported = match rhr {
      Value::Null | Value::Bool(false) => false,
      Value::String(s) => !s.is_empty(),
      Value::Array(items) => !items.is_empty(),
      Value::Object(map) => !map.is_empty(),
      _ => true,
    };
    reported && to_f64(Some(rhr)).is_none()
  }

  /// Total sleep for the night in hours
  pub fn sleep_hours(&self) -> Option<f64> {
    let total = self
      .sleep()
      .and_then(|s| s.get("duration"))
      .and_then(|d| d.get("total"));
    to_f64(total).filter(|v| *v > 0.0)
  }
}

impl From<Value> for RecoveryRecord {
  fn from(raw: Value) -> Self {
    Self(raw)
  }
}
