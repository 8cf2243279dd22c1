//! Budget and quality reporting over a prepared context
//!
//! Two views used when tuning the window sizes:
//! - [`SizeReport`]: how much smaller the prepared context is than the raw
//!   dataset, in characters and estimated tokens
//! - [`TrendOverview`]: what the weekly trends still say about training
//!   volume, consistency and history depth

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::context::PreparedContext;
use crate::error::Result;
use crate::models::TrainingDataset;
use crate::weekly::WeeklyTrend;

/// Rough JSON token density: ~4 characters per token
const CHARS_PER_TOKEN: usize = 4;

/// Average number of weeks in a month
const WEEKS_PER_MONTH: f64 = 4.33;

pub fn estimate_tokens(text: &str) -> usize {
  text.chars().count() / CHARS_PER_TOKEN
}

/// ---------------------------------------------------------------------------
/// Size Report
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeReport {
  pub raw_chars: usize,
  pub prepared_chars: usize,
  pub raw_tokens: usize,
  pub prepared_tokens: usize,
  /// Percentage saved relative to the raw dataset (negative if it grew)
  pub reduction_pct: f64,
}

impl SizeReport {
  pub fn from_json(raw_json: &str, prepared_json: &str) -> Self {
    let raw_chars = raw_json.chars().count();
    let prepared_chars = prepared_json.chars().count();
    let reduction_pct = if raw_chars > 0 {
      100.0 * (1.0 - prepared_chars as f64 / raw_chars as f64)
    } else {
      0.0
    };

    Self {
      raw_chars,
      prepared_chars,
      raw_tokens: estimate_tokens(raw_json),
      prepared_tokens: estimate_tokens(prepared_json),
      reduction_pct,
    }
  }

  /// Compare compact serializations of the dataset and its prepared context
  pub fn compare(dataset: &TrainingDataset, context: &PreparedContext) -> Result<Self> {
    let raw_json = serde_json::to_string(dataset)?;
    let prepared_json = context.to_json(false)?;
    Ok(Self::from_json(&raw_json, &prepared_json))
  }
}

/// ---------------------------------------------------------------------------
/// Trend Overview
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryDepth {
  /// 6+ months
  Excellent,
  /// 3+ months
  Good,
  /// 2+ months
  Adequate,
  Limited,
}

impl HistoryDepth {
  pub fn from_months(months: f64) -> Self {
    match months {
      m if m >= 6.0 => HistoryDepth::Excellent,
      m if m >= 3.0 => HistoryDepth::Good,
      m if m >= 2.0 => HistoryDepth::Adequate,
      _ => HistoryDepth::Limited,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      HistoryDepth::Excellent => "excellent",
      HistoryDepth::Good => "good",
      HistoryDepth::Adequate => "adequate",
      HistoryDepth::Limited => "limited",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakWeek {
  pub week_number: u32,
  pub week_start: chrono::NaiveDate,
  pub total_distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendOverview {
  pub total_weeks: usize,
  pub weeks_with_activity: usize,
  pub avg_weekly_activities: f64,
  pub avg_weekly_distance_km: f64,
  pub avg_weekly_duration_hours: f64,
  /// Highest-distance week; earliest wins on ties
  pub peak_week: Option<PeakWeek>,
  pub activity_types: Vec<String>,
  pub months_of_history: f64,
  pub history_depth: HistoryDepth,
}

impl TrendOverview {
  pub fn compute(trends: &[WeeklyTrend]) -> Self {
    let total_weeks = trends.len();
    let weeks_with_activity = trends
      .iter()
      .filter(|w| w.volume.total_activities > 0)
      .count();

    let mean = |pick: fn(&WeeklyTrend) -> f64| -> f64 {
      if total_weeks == 0 {
        0.0
      } else {
        trends.iter().map(pick).sum::<f64>() / total_weeks as f64
      }
    };

    let mut peak_week: Option<&WeeklyTrend> = None;
    for week in trends {
      let better = peak_week.map_or(true, |peak| {
        week.volume.total_distance_km > peak.volume.total_distance_km
      });
      if better {
        peak_week = Some(week);
      }
    }

    let activity_types: BTreeSet<&String> = trends
      .iter()
      .flat_map(|w| w.by_activity_type.counts.keys())
      .collect();

    let months_of_history = total_weeks as f64 / WEEKS_PER_MONTH;

    Self {
      total_weeks,
      weeks_with_activity,
      avg_weekly_activities: mean(|w: &WeeklyTrend| w.volume.total_activities as f64),
      avg_weekly_distance_km: mean(|w: &WeeklyTrend| w.volume.total_distance_km),
      avg_weekly_duration_hours: mean(|w: &WeeklyTrend| w.volume.total_duration_hours),
      peak_week: peak_week.map(|w| PeakWeek {
        week_number: w.week_number,
        week_start: w.week_start,
        total_distance_km: w.volume.total_distance_km,
      }),
      activity_types: activity_types.into_iter().cloned().collect(),
      months_of_history,
      history_depth: HistoryDepth::from_months(months_of_history),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_approx_eq;
  use crate::context::{prepare, PrepareOptions};
  use crate::test_utils::{mock_activity, mock_dataset, ymd};
  use crate::weekly::aggregate_weeks;
  use crate::window::{partition, Cutoffs};

  fn trends_for(activities: &[crate::models::ActivityRecord], trends_days: u32) -> Vec<WeeklyTrend> {
    let cutoffs = Cutoffs::new(ymd(2025, 11, 23), 14, trends_days);
    let split = partition(activities, &cutoffs);
    aggregate_weeks(&split.historical, &[], &cutoffs)
      .iter()
      .map(|w| w.to_trend())
      .collect()
  }

  #[test]
  fn test_estimate_tokens() {
    assert_eq!(estimate_tokens(""), 0);
    assert_eq!(estimate_tokens("abcd"), 1);
    assert_eq!(estimate_tokens("abcdefghij"), 2);
  }

  #[test]
  fn test_size_report_from_json() {
    let report = SizeReport::from_json(&"x".repeat(4000), &"y".repeat(1000));

    assert_eq!(report.raw_tokens, 1000);
    assert_eq!(report.prepared_tokens, 250);
    assert_approx_eq!(report.reduction_pct, 75.0, 1e-9);
  }

  #[test]
  fn test_size_report_empty_raw() {
    let report = SizeReport::from_json("", "{}");
    assert_eq!(report.reduction_pct, 0.0);
  }

  #[test]
  fn test_size_report_compare() {
    let activities = (15..80)
      .map(|d| mock_activity("running", ymd(2025, 11, 23) - chrono::Duration::days(d), 8000.0, 2700.0))
      .collect();
    let dataset = mock_dataset(activities, vec![]);
    let context = prepare(&dataset, &PrepareOptions::for_date(ymd(2025, 11, 23)));

    let report = SizeReport::compare(&dataset, &context).unwrap();

    assert!(report.prepared_chars < report.raw_chars);
    assert!(report.reduction_pct > 0.0);
  }

  #[test]
  fn test_overview_volume_and_peak() {
    // Arrange: two active weeks, the October one is bigger
    let activities = vec![
      mock_activity("running", ymd(2025, 9, 3), 10000.0, 3600.0),
      mock_activity("cycling", ymd(2025, 10, 14), 40000.0, 7200.0),
      mock_activity("swimming", ymd(2025, 10, 16), 2000.0, 3600.0),
    ];
    let trends = trends_for(&activities, 90);

    // Act
    let overview = TrendOverview::compute(&trends);

    // Assert
    assert_eq!(overview.total_weeks, 11);
    assert_eq!(overview.weeks_with_activity, 2);
    assert_approx_eq!(overview.avg_weekly_activities, 3.0 / 11.0, 1e-9);
    assert_approx_eq!(overview.avg_weekly_distance_km, 52.0 / 11.0, 1e-9);
    assert_approx_eq!(overview.avg_weekly_duration_hours, 4.0 / 11.0, 1e-9);

    let peak = overview.peak_week.unwrap();
    assert_eq!(peak.week_start, ymd(2025, 10, 13));
    assert_eq!(peak.total_distance_km, 42.0);
    assert_eq!(overview.activity_types, vec!["cycling", "running", "swimming"]);
  }

  #[test]
  fn test_overview_empty_trends() {
    let overview = TrendOverview::compute(&[]);

    assert_eq!(overview.total_weeks, 0);
    assert_eq!(overview.avg_weekly_distance_km, 0.0);
    assert!(overview.peak_week.is_none());
    assert!(overview.activity_types.is_empty());
    assert_eq!(overview.history_depth, HistoryDepth::Limited);
  }

  #[test]
  fn test_overview_peak_tie_keeps_earliest() {
    let trends = trends_for(&[], 90);

    let overview = TrendOverview::compute(&trends);

    // All weeks are empty: the first one is the peak
    assert_eq!(overview.peak_week.unwrap().week_number, 1);
  }

  #[test]
  fn test_history_depth_thresholds() {
    assert_eq!(HistoryDepth::from_months(6.5), HistoryDepth::Excellent);
    assert_eq!(HistoryDepth::from_months(3.0), HistoryDepth::Good);
    assert_eq!(HistoryDepth::from_months(2.5), HistoryDepth::Adequate);
    assert_eq!(HistoryDepth::from_months(1.0), HistoryDepth::Limited);

    // 90-day trends produce 11 weeks: ~2.5 months
    let overview = TrendOverview::compute(&trends_for(&[], 90));
    assert_eq!(overview.history_depth, HistoryDepth::Adequate);

    // 180-day trends: 24 weeks here, ~5.5 months
    let overview = TrendOverview::compute(&trends_for(&[], 180));
    assert_eq!(overview.history_depth, HistoryDepth::Good);
    assert_eq!(overview.history_depth.as_str(), "good");
  }
}
