use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use super::{ActivityRecord, RecoveryRecord};
use crate::error::{ContextError, Result};

/// The full, already-materialized dataset for one athlete
///
/// Missing or `null` keys are treated as empty; a key holding the wrong
/// JSON type (e.g. `recent_activities` as a string) is a contract
/// violation by the data source and rejected as malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingDataset {
  #[serde(default, deserialize_with = "null_as_default")]
  pub recent_activities: Vec<ActivityRecord>,

  #[serde(default, deserialize_with = "null_as_default")]
  pub recovery_indicators: Vec<RecoveryRecord>,

  /// Latest physiological markers (resting HR, VO2max, HRV)
  #[serde(default, deserialize_with = "null_as_default")]
  pub physiological_markers: Map<String, Value>,

  /// Latest training status (acute/chronic load, ACWR)
  #[serde(default, deserialize_with = "null_as_default")]
  pub training_status: Map<String, Value>,

  /// Latest daily stats (stress, resting HR)
  #[serde(default, deserialize_with = "null_as_default")]
  pub daily_stats: Map<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl TrainingDataset {
  /// Validate the top-level shape and build a dataset
  pub fn from_value(value: Value) -> Result<Self> {
    if !value.is_object() {
      return Err(ContextError::malformed(format!(
        "expected a JSON object at the top level, found {}",
        json_type_name(&value)
      )));
    }

    serde_json::from_value(value).map_err(|e| ContextError::malformed(e.to_string()))
  }

  pub fn from_json_str(json: &str) -> Result<Self> {
    let value: Value = serde_json::from_str(json)?;
    Self::from_value(value)
  }

  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let contents = std::fs::read_to_string(path)?;
    Self::from_json_str(&contents)
  }

  pub fn is_empty(&self) -> bool {
    self.recent_activities.is_empty()
      && self.recovery_indicators.is_empty()
      && self.physiological_markers.is_empty()
      && self.training_status.is_empty()
      && self.daily_stats.is_empty()
  }
}

fn json_type_name(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}
