//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Mock record factories (activities, recovery entries)
//! - A fully-populated mock dataset
//! - Date helpers and float assertions

use chrono::{Duration, NaiveDate};
use serde_json::{json, Map, Value};

use crate::models::{ActivityRecord, RecoveryRecord, TrainingDataset};

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Create a mock activity with distance (m) and duration (s) on a given date
pub fn mock_activity(
  activity_type: &str,
  date: NaiveDate,
  distance_m: f64,
  duration_s: f64,
) -> ActivityRecord {
  ActivityRecord::new(json!({
    "activity_id": format!("act_{}_{}", activity_type, date),
    "activity_name": format!("{} Session", activity_type),
    "activity_type": activity_type,
    "start_time": format!("{}T06:00:00", date),
    "summary": {
      "distance": distance_m,
      "duration": duration_s,
    },
  }))
}

/// Create a mock activity with only a type and a raw start timestamp
pub fn mock_activity_on(activity_type: &str, start_time: &str) -> ActivityRecord {
  mock_activity_with_summary(activity_type, start_time, json!({}))
}

/// Create a mock activity with an arbitrary summary block
pub fn mock_activity_with_summary(
  activity_type: &str,
  start_time: &str,
  summary: Value,
) -> ActivityRecord {
  ActivityRecord::new(json!({
    "activity_type": activity_type,
    "start_time": start_time,
    "summary": summary,
  }))
}

/// Create a mock recovery entry; `None` leaves the field out entirely
pub fn mock_recovery(date: &str, resting_hr: Option<f64>, sleep_hours: Option<f64>) -> RecoveryRecord {
  let mut sleep = Map::new();
  if let Some(rhr) = resting_hr {
    sleep.insert("resting_heart_rate".into(), json!(rhr));
  }
  if let Some(hours) = sleep_hours {
    sleep.insert("duration".into(), json!({ "total": hours }));
  }

  RecoveryRecord::new(json!({
    "date": date,
    "sleep": sleep,
  }))
}

/// Create a dataset with the given records and a full set of current markers
pub fn mock_dataset(activities: Vec<ActivityRecord>, recovery: Vec<RecoveryRecord>) -> TrainingDataset {
  let object = |value: Value| value.as_object().cloned().unwrap_or_default();

  TrainingDataset {
    recent_activities: activities,
    recovery_indicators: recovery,
    physiological_markers: object(json!({
      "resting_heart_rate": 52,
      "vo2_max": 58.5,
      "hrv": {"weekly_avg": 65, "last_night_avg": 68},
    })),
    training_status: object(json!({
      "acute_training_load": {"acute_load": 450, "chronic_load": 380, "acwr": 1.18},
    })),
    daily_stats: object(json!({
      "average_stress_level": 35,
      "resting_heart_rate": 52,
    })),
  }
}

/// ---------------------------------------------------------------------------
/// Date Helpers
/// ---------------------------------------------------------------------------

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub fn days_before(date: NaiveDate, days: i64) -> NaiveDate {
  date - Duration::days(days)
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mock_factories_create_valid_data() {
    let activity = mock_activity("running", ymd(2025, 11, 20), 10000.0, 3600.0);
    assert_eq!(activity.activity_type(), "running");
    assert_eq!(activity.date(), Some(ymd(2025, 11, 20)));
    assert_eq!(activity.distance_meters(), 10000.0);

    let recovery = mock_recovery("2025-11-20", Some(52.0), None);
    assert_eq!(recovery.resting_heart_rate(), Some(52.0));
    assert_eq!(recovery.sleep_hours(), None);

    let dataset = mock_dataset(vec![activity], vec![recovery]);
    assert_eq!(dataset.recent_activities.len(), 1);
    assert!(dataset.training_status.contains_key("acute_training_load"));
  }

  #[test]
  fn test_date_helpers() {
    assert_eq!(days_before(ymd(2025, 11, 23), 7), ymd(2025, 11, 16));
    assert_approx_eq!(0.1_f64 + 0.2, 0.3, 1e-9);
  }
}
