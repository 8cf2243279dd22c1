//! Current-state snapshot of physiological and training-load markers
//!
//! A pure projection of the latest markers present in the dataset. Values
//! are passed through as-is (HRV, for instance, is usually a nested block);
//! anything missing or `null` upstream is `null` here, never zero.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::TrainingDataset;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentMetrics {
  pub resting_heart_rate: Option<Value>,
  pub vo2_max: Option<Value>,
  pub hrv: Option<Value>,
  pub training_load: TrainingLoadSnapshot,
  pub current_stress: Option<Value>,
  pub current_rhr: Option<Value>,
}

/// Acute/chronic load and their ratio (ACWR)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingLoadSnapshot {
  pub acute: Option<Value>,
  pub chronic: Option<Value>,
  pub acwr: Option<Value>,
}

impl CurrentMetrics {
  pub fn extract(dataset: &TrainingDataset) -> Self {
    let physiological = &dataset.physiological_markers;
    let daily = &dataset.daily_stats;
    let acute_block = dataset
      .training_status
      .get("acute_training_load")
      .and_then(Value::as_object);

    let load_field = |key: &str| acute_block.and_then(|block| field(block, key));

    Self {
      resting_heart_rate: field(physiological, "resting_heart_rate"),
      vo2_max: field(physiological, "vo2_max"),
      hrv: field(physiological, "hrv"),
      training_load: TrainingLoadSnapshot {
        acute: load_field("acute_load"),
        chronic: load_field("chronic_load"),
        acwr: load_field("acwr"),
      },
      current_stress: field(daily, "average_stress_level"),
      current_rhr: field(daily, "resting_heart_rate"),
    }
  }

  /// True when no marker at all was present upstream
  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }
}

fn field(block: &Map<String, Value>, key: &str) -> Option<Value> {
  block.get(key).filter(|v| !v.is_null()).cloned()
}
