//! Weekly aggregation of the historical zone
//!
//! Historical activities are grouped by the Monday of their date and one
//! aggregate is emitted for every week between the trends cutoff and the
//! recent cutoff, including weeks with nothing in them. Recovery entries
//! are joined onto each week by inclusive date range.
//!
//! Null vs zero: sums start at 0.0 and absorb junk as 0.0, but averages,
//! maxima and "longest" values are `None` when nothing intelligible was
//! reported, so consumers can tell "measured zero" from "absent".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::coerce::round_to;
use crate::dates::{week_end, week_start};
use crate::models::{ActivityRecord, RecoveryRecord};
use crate::window::{Cutoffs, DatedActivity};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// ---------------------------------------------------------------------------
/// Weekly Aggregate
/// ---------------------------------------------------------------------------

/// Per-activity-type running totals for one week
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeTotals {
  pub count: u32,
  pub distance_km: f64,
  pub duration_hours: f64,
}

/// Unrounded training metrics for a single Monday-to-Sunday week
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyAggregate {
  pub week_start: NaiveDate,
  pub week_end: NaiveDate,
  /// 1-based position within the requested window
  pub week_number: u32,

  // Volume
  pub total_activities: u32,
  pub total_distance_km: f64,
  pub total_duration_hours: f64,
  pub total_elevation_gain_m: f64,

  /// Keyed by the free-form activity type tag
  pub by_type: BTreeMap<String, TypeTotals>,

  // Intensity
  pub avg_heart_rate: Option<f64>,
  pub max_heart_rate: Option<i64>,
  pub total_training_load: Option<f64>,

  // Key sessions
  pub longest_activity_distance_km: Option<f64>,
  pub longest_activity_duration_hours: Option<f64>,
  pub highest_intensity_activity: Option<String>,

  // Recovery
  pub avg_resting_hr: Option<f64>,
  pub avg_sleep_hours: Option<f64>,
}

impl WeeklyAggregate {
  pub fn has_activity(&self) -> bool {
    self.total_activities > 0
  }

  /// Rounded, nested projection handed to downstream consumers
  pub fn to_trend(&self) -> WeeklyTrend {
    let round_map = |pick: fn(&TypeTotals) -> f64| -> BTreeMap<String, f64> {
      self
        .by_type
        .iter()
        .map(|(k, totals)| (k.clone(), round_to(pick(totals), 2)))
        .collect()
    };

    WeeklyTrend {
      week_start: self.week_start,
      week_end: self.week_end,
      week_number: self.week_number,
      volume: VolumeSummary {
        total_activities: self.total_activities,
        total_distance_km: round_to(self.total_distance_km, 2),
        total_duration_hours: round_to(self.total_duration_hours, 2),
        total_elevation_gain_m: round_to(self.total_elevation_gain_m, 2),
      },
      by_activity_type: ActivityTypeBreakdown {
        counts: self.by_type.iter().map(|(k, t)| (k.clone(), t.count)).collect(),
        distance_km: round_map(|t: &TypeTotals| t.distance_km),
        duration_hours: round_map(|t: &TypeTotals| t.duration_hours),
      },
      intensity: IntensitySummary {
        avg_heart_rate: self.avg_heart_rate.map(|v| round_to(v, 1)),
        max_heart_rate: self.max_heart_rate,
        total_training_load: self.total_training_load.map(|v| round_to(v, 1)),
      },
      key_sessions: KeySessions {
        longest_distance_km: self.longest_activity_distance_km.map(|v| round_to(v, 2)),
        longest_duration_hours: self.longest_activity_duration_hours.map(|v| round_to(v, 2)),
        highest_intensity_type: self.highest_intensity_activity.clone(),
      },
      recovery: RecoverySummary {
        avg_resting_hr: self.avg_resting_hr.map(|v| round_to(v, 1)),
        avg_sleep_hours: self.avg_sleep_hours.map(|v| round_to(v, 2)),
      },
    }
  }
}

/// ---------------------------------------------------------------------------
/// Output Projection
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTrend {
  pub week_start: NaiveDate,
  pub week_end: NaiveDate,
  pub week_number: u32,
  pub volume: VolumeSummary,
  pub by_activity_type: ActivityTypeBreakdown,
  pub intensity: IntensitySummary,
  pub key_sessions: KeySessions,
  pub recovery: RecoverySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSummary {
  pub total_activities: u32,
  pub total_distance_km: f64,
  pub total_duration_hours: f64,
  pub total_elevation_gain_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTypeBreakdown {
  pub counts: BTreeMap<String, u32>,
  pub distance_km: BTreeMap<String, f64>,
  pub duration_hours: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensitySummary {
  pub avg_heart_rate: Option<f64>,
  pub max_heart_rate: Option<i64>,
  pub total_training_load: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeySessions {
  pub longest_distance_km: Option<f64>,
  pub longest_duration_hours: Option<f64>,
  pub highest_intensity_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoverySummary {
  pub avg_resting_hr: Option<f64>,
  pub avg_sleep_hours: Option<f64>,
}

/// ---------------------------------------------------------------------------
/// Accumulation
/// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct WeekAccumulator {
  total_activities: u32,
  total_distance_km: f64,
  total_duration_hours: f64,
  total_elevation_gain_m: f64,
  total_training_load: f64,
  by_type: BTreeMap<String, TypeTotals>,
  heart_rate_sum: f64,
  heart_rate_count: u32,
  max_heart_rate: Option<i64>,
  longest_distance_km: f64,
  longest_duration_hours: f64,
  max_intensity_load: f64,
  highest_intensity_activity: Option<String>,
}

impl WeekAccumulator {
  fn add(&mut self, activity: &ActivityRecord) {
    let activity_type = activity.activity_type();
    let distance_km = activity.distance_meters() / 1000.0;
    let duration_hours = activity.duration_seconds() / 3600.0;
    let training_load = activity.training_load();

    self.total_activities += 1;
    self.total_distance_km += distance_km;
    self.total_duration_hours += duration_hours;
    self.total_elevation_gain_m += activity.elevation_gain_meters();
    self.total_training_load += training_load;

    let totals = self.by_type.entry(activity_type.to_string()).or_default();
    totals.count += 1;
    totals.distance_km += distance_km;
    totals.duration_hours += duration_hours;

    if let Some(hr) = activity.average_hr() {
      self.heart_rate_sum += hr;
      self.heart_rate_count += 1;
    }
    if let Some(hr) = activity.max_hr() {
      self.max_heart_rate = Some(self.max_heart_rate.map_or(hr, |curr| curr.max(hr)));
    }

    if distance_km > self.longest_distance_km {
      self.longest_distance_km = distance_km;
    }
    if duration_hours > self.longest_duration_hours {
      self.longest_duration_hours = duration_hours;
    }

    // Strict `>`: on ties the first activity seen keeps the title
    if training_load > self.max_intensity_load {
      self.max_intensity_load = training_load;
      self.highest_intensity_activity = Some(activity_type.to_string());
    }
  }

  fn finish(self, week_start: NaiveDate, week_number: u32, recovery: WeekRecovery) -> WeeklyAggregate {
    let positive = |v: f64| if v > 0.0 { Some(v) } else { None };
    let avg_heart_rate =
      (self.heart_rate_count > 0).then(|| self.heart_rate_sum / self.heart_rate_count as f64);

    WeeklyAggregate {
      week_start,
      week_end: week_end(week_start),
      week_number,
      total_activities: self.total_activities,
      total_distance_km: self.total_distance_km,
      total_duration_hours: self.total_duration_hours,
      total_elevation_gain_m: self.total_elevation_gain_m,
      by_type: self.by_type,
      avg_heart_rate,
      max_heart_rate: self.max_heart_rate,
      total_training_load: positive(self.total_training_load),
      longest_activity_distance_km: positive(self.longest_distance_km),
      longest_activity_duration_hours: positive(self.longest_duration_hours),
      highest_intensity_activity: self.highest_intensity_activity,
      avg_resting_hr: recovery.avg_resting_hr,
      avg_sleep_hours: recovery.avg_sleep_hours,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Recovery Join
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeekRecovery {
  pub avg_resting_hr: Option<f64>,
  pub avg_sleep_hours: Option<f64>,
}

#[derive(Debug, Default)]
struct RecoveryTotals {
  resting_hr_sum: f64,
  resting_hr_count: u32,
  sleep_sum: f64,
  sleep_count: u32,
}

/// Recovery entries bucketed once by the Monday of their date
///
/// Weeks are Monday-aligned, so the bucket for `week_start` holds exactly
/// the entries dated within `[week_start, week_start + 6]`.
#[derive(Debug, Default)]
pub struct RecoveryIndex {
  weeks: BTreeMap<NaiveDate, RecoveryTotals>,
}

impl RecoveryIndex {
  pub fn build(entries: &[RecoveryRecord]) -> Self {
    let mut index = Self::default();
    let mut skipped = 0usize;

    for entry in entries {
      let Some(date) = entry.date() else {
        skipped += 1;
        continue;
      };
      if entry.has_unreadable_resting_heart_rate() {
        debug!(date = ?entry.raw().get("date"), "Skipping recovery entry with unreadable resting heart rate");
        skipped += 1;
        continue;
      }

      let rhr = entry.resting_heart_rate();
      let sleep = entry.sleep_hours();
      if rhr.is_none() && sleep.is_none() {
        skipped += 1;
        continue;
      }

      let totals = index.weeks.entry(week_start(date)).or_default();
      if let Some(rhr) = rhr {
        totals.resting_hr_sum += rhr;
        totals.resting_hr_count += 1;
      }
      if let Some(hours) = sleep {
        totals.sleep_sum += hours;
        totals.sleep_count += 1;
      }
    }

    if skipped > 0 {
      debug!(skipped, "Recovery entries without a usable date or sleep metrics skipped");
    }

    index
  }

  /// Average resting HR and sleep hours for the week starting at `week_start`
  pub fn week(&self, week_start: NaiveDate) -> WeekRecovery {
    let Some(totals) = self.weeks.get(&week_start) else {
      return WeekRecovery::default();
    };

    let avg = |sum: f64, count: u32| (count > 0).then(|| sum / count as f64);
    WeekRecovery {
      avg_resting_hr: avg(totals.resting_hr_sum, totals.resting_hr_count),
      avg_sleep_hours: avg(totals.sleep_sum, totals.sleep_count),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Aggregation
/// ---------------------------------------------------------------------------

/// Build one aggregate per week of the trends zone, oldest first
pub fn aggregate_weeks(
  historical: &[DatedActivity<'_>],
  recovery: &[RecoveryRecord],
  cutoffs: &Cutoffs,
) -> Vec<WeeklyAggregate> {
  let mut grouped: BTreeMap<NaiveDate, Vec<&ActivityRecord>> = BTreeMap::new();
  for dated in historical {
    grouped.entry(week_start(dated.date)).or_default().push(dated.activity);
  }

  let recovery_index = RecoveryIndex::build(recovery);
  let weeks = cutoffs.week_starts();

  let build_week = |(idx, start): (usize, &NaiveDate)| {
    let mut acc = WeekAccumulator::default();
    for activity in grouped.get(start).map(Vec::as_slice).unwrap_or_default() {
      acc.add(activity);
    }
    acc.finish(*start, idx as u32 + 1, recovery_index.week(*start))
  };

  #[cfg(feature = "parallel")]
  let aggregates: Vec<WeeklyAggregate> = weeks.par_iter().enumerate().map(build_week).collect();

  #[cfg(not(feature = "parallel"))]
  let aggregates: Vec<WeeklyAggregate> = weeks.iter().enumerate().map(build_week).collect();

  let emitted: u32 = aggregates.iter().map(|w| w.total_activities).sum();
  if (emitted as usize) < historical.len() {
    // Only possible when the recent cutoff is itself a Monday: its week is never emitted
    debug!(
      dropped = historical.len() - emitted as usize,
      "Historical activities outside every emitted week"
    );
  }
  info!(weeks = aggregates.len(), "Created weekly aggregates");

  aggregates
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
