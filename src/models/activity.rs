use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::{safe_float, safe_int, to_f64};
use crate::dates::parse_date;

pub const UNKNOWN_ACTIVITY_TYPE: &str = "unknown";

/// A single activity as delivered by the data source.
///
/// The record is kept verbatim so recent activities can be handed to
/// downstream consumers unmodified (laps, weather and any other upstream
/// fields included). Typed accessors read the handful of fields the
/// engine needs and degrade to safe defaults on missing or junk values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityRecord(Value);

impl ActivityRecord {
  pub fn new(raw: Value) -> Self {
    Self(raw)
  }

  pub fn raw(&self) -> &Value {
    &self.0
  }

  pub fn activity_id(&self) -> Option<&Value> {
    self.0.get("activity_id").filter(|v| !v.is_null())
  }

  /// Free-form activity type tag, `"unknown"` when absent
  pub fn activity_type(&self) -> &str {
    match self.0.get("activity_type") {
      Some(Value::String(s)) => s.as_str(),
      _ => UNKNOWN_ACTIVITY_TYPE,
    }
  }

  /// Raw start timestamp, if it is a string at all
  pub fn start_time(&self) -> Option<&str> {
    self.0.get("start_time").and_then(Value::as_str)
  }

  /// Calendar date of the activity start, `None` when unparseable
  pub fn date(&self) -> Option<NaiveDate> {
    self.start_time().and_then(parse_date)
  }

  fn summary_field(&self, key: &str) -> Option<&Value> {
    self.0.get("summary").and_then(|s| s.get(key))
  }

  pub fn distance_meters(&self) -> f64 {
    safe_float(self.summary_field("distance"), 0.0)
  }

  pub fn duration_seconds(&self) -> f64 {
    safe_float(self.summary_field("duration"), 0.0)
  }

  pub fn elevation_gain_meters(&self) -> f64 {
    safe_float(self.summary_field("elevation_gain"), 0.0)
  }

  pub fn training_load(&self) -> f64 {
    safe_float(self.summary_field("activity_training_load"), 0.0)
  }

  /// Average heart rate, only when reported as a positive value
  pub fn average_hr(&self) -> Option<f64> {
    to_f64(self.summary_field("average_hr")).filter(|hr| *hr > 0.0)
  }

  /// Max heart rate, only when reported as a positive value
  pub fn max_hr(&self) -> Option<i64> {
    Some(safe_int(self.summary_field("max_hr"), 0)).filter(|hr| *hr > 0)
  }
}

impl From<Value> for ActivityRecord {
  fn from(raw: Value) -> Self {
    Self(raw)
  }
}
