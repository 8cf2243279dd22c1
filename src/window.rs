//! Sliding-window partitioning of the activity history
//!
//! Two cutoffs measured backward from the analysis date split activities
//! into three disjoint buckets:
//! - recent: `date > recent_cutoff` (kept at full fidelity)
//! - historical: `recent_cutoff >= date > trends_cutoff` (aggregated by week)
//! - discarded: `date <= trends_cutoff`
//!
//! Records without a parseable date fall into none of them.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::dates::week_start;
use crate::models::ActivityRecord;

pub const DEFAULT_RECENT_WINDOW_DAYS: u32 = 14;
pub const DEFAULT_TRENDS_WINDOW_DAYS: u32 = 90;

/// Longest window accepted (~10 years); longer windows are clamped
pub const MAX_WINDOW_DAYS: u32 = 3650;

/// ---------------------------------------------------------------------------
/// Cutoffs
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cutoffs {
  pub recent: NaiveDate,
  pub trends: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
  Recent,
  Historical,
  Discarded,
}

impl Cutoffs {
  pub fn new(today: NaiveDate, recent_window_days: u32, trends_window_days: u32) -> Self {
    Self {
      recent: days_back(today, recent_window_days),
      trends: days_back(today, trends_window_days),
    }
  }

  /// Strict `>` on both sides: a date equal to a cutoff drops to the older bucket
  pub fn classify(&self, date: NaiveDate) -> Bucket {
    if date > self.recent {
      Bucket::Recent
    } else if date > self.trends {
      Bucket::Historical
    } else {
      Bucket::Discarded
    }
  }

  /// Monday on or before the trends cutoff; the first week emitted
  pub fn first_week_start(&self) -> NaiveDate {
    week_start(self.trends)
  }

  /// Week starts covered by the trends zone, oldest first
  ///
  /// Every Monday from [`Self::first_week_start`] while strictly before the
  /// recent cutoff, whether or not anything happened that week.
  pub fn week_starts(&self) -> Vec<NaiveDate> {
    let mut weeks = Vec::new();
    let mut current = self.first_week_start();
    while current < self.recent {
      weeks.push(current);
      match current.checked_add_signed(Duration::days(7)) {
        Some(next) => current = next,
        None => break,
      }
    }
    weeks
  }
}

/// `today - days`, clamped to [`MAX_WINDOW_DAYS`] and the earliest representable date
fn days_back(today: NaiveDate, days: u32) -> NaiveDate {
  if days > MAX_WINDOW_DAYS {
    warn!(days, max = MAX_WINDOW_DAYS, "Window longer than supported, clamping");
  }
  let days = days.min(MAX_WINDOW_DAYS);
  today
    .checked_sub_signed(Duration::days(days as i64))
    .unwrap_or(NaiveDate::MIN)
}

/// ---------------------------------------------------------------------------
/// Partition
/// ---------------------------------------------------------------------------

/// A historical activity paired with its already-extracted date
#[derive(Debug, Clone, Copy)]
pub struct DatedActivity<'a> {
  pub date: NaiveDate,
  pub activity: &'a ActivityRecord,
}

#[derive(Debug, Clone, Default)]
pub struct Partition<'a> {
  /// In input order
  pub recent: Vec<&'a ActivityRecord>,
  /// In input order
  pub historical: Vec<DatedActivity<'a>>,
  pub discarded: usize,
  pub unparseable: usize,
}

/// Split activities into recent / historical / discarded buckets
pub fn partition<'a>(activities: &'a [ActivityRecord], cutoffs: &Cutoffs) -> Partition<'a> {
  let mut result = Partition::default();

  for activity in activities {
    let Some(date) = activity.date() else {
      warn!(
        start_time = ?activity.raw().get("start_time"),
        "Skipping activity with unparseable start date"
      );
      result.unparseable += 1;
      continue;
    };

    match cutoffs.classify(date) {
      Bucket::Recent => result.recent.push(activity),
      Bucket::Historical => result.historical.push(DatedActivity { date, activity }),
      Bucket::Discarded => result.discarded += 1,
    }
  }

  info!(
    recent = result.recent.len(),
    historical = result.historical.len(),
    "Split activities"
  );
  if result.discarded > 0 {
    debug!(discarded = result.discarded, "Activities older than the trends window dropped");
  }

  result
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{days_before, mock_activity, mock_activity_on, ymd};
  use chrono::Datelike;
  use serde_json::json;

  fn today() -> NaiveDate {
    ymd(2025, 11, 23)
  }

  #[test]
  fn test_cutoffs() {
    let cutoffs = Cutoffs::new(today(), 14, 90);
    assert_eq!(cutoffs.recent, NaiveDate::from_ymd_opt(2025, 11, 9).unwrap());
    assert_eq!(cutoffs.trends, NaiveDate::from_ymd_opt(2025, 8, 25).unwrap());
  }

  #[test]
  fn test_classify_boundaries() {
    let cutoffs = Cutoffs::new(today(), 14, 90);

    // Exactly on the recent cutoff is historical, one day later is recent
    assert_eq!(cutoffs.classify(cutoffs.recent), Bucket::Historical);
    assert_eq!(cutoffs.classify(cutoffs.recent + Duration::days(1)), Bucket::Recent);

    // Exactly on the trends cutoff is discarded, one day later is historical
    assert_eq!(cutoffs.classify(cutoffs.trends), Bucket::Discarded);
    assert_eq!(cutoffs.classify(cutoffs.trends + Duration::days(1)), Bucket::Historical);

    assert_eq!(cutoffs.classify(today()), Bucket::Recent);
  }

  #[test]
  fn test_week_starts_cover_trends_zone() {
    let cutoffs = Cutoffs::new(today(), 14, 90);
    let weeks = cutoffs.week_starts();

    // Trends cutoff 2025-08-25 is a Monday; recent cutoff 2025-11-09 is a Sunday
    assert_eq!(weeks.first(), Some(&NaiveDate::from_ymd_opt(2025, 8, 25).unwrap()));
    assert_eq!(weeks.last(), Some(&NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()));
    assert_eq!(weeks.len(), 11);

    for pair in weeks.windows(2) {
      assert_eq!(pair[1] - pair[0], Duration::days(7));
    }
    assert!(weeks.iter().all(|w| w.weekday() == chrono::Weekday::Mon));
  }

  #[test]
  fn test_week_starts_stop_before_monday_recent_cutoff() {
    // Monday 2025-11-24: recent cutoff is Monday 2025-11-10, trends cutoff Tuesday 2025-08-26
    let cutoffs = Cutoffs::new(ymd(2025, 11, 24), 14, 90);
    let weeks = cutoffs.week_starts();

    assert_eq!(cutoffs.recent.weekday(), chrono::Weekday::Mon);
    assert_eq!(weeks.first(), Some(&ymd(2025, 8, 25)));
    assert_eq!(weeks.last(), Some(&ymd(2025, 11, 3)));
    assert!(!weeks.contains(&cutoffs.recent));
    // 7-day steps from 2025-08-25 while strictly before 2025-11-10
    assert_eq!(weeks.len(), 11);
  }

  #[test]
  fn test_oversized_windows_are_clamped() {
    let cutoffs = Cutoffs::new(today(), 14, u32::MAX);

    assert_eq!(cutoffs.trends, days_before(today(), MAX_WINDOW_DAYS as i64));
    assert_eq!(cutoffs.week_starts().len(), Cutoffs::new(today(), 14, MAX_WINDOW_DAYS).week_starts().len());
  }

  #[test]
  fn test_cutoffs_near_earliest_date_do_not_overflow() {
    let today = NaiveDate::MIN + Duration::days(3);

    let cutoffs = Cutoffs::new(today, 14, 90);

    assert_eq!(cutoffs.recent, NaiveDate::MIN);
    assert_eq!(cutoffs.trends, NaiveDate::MIN);
    assert!(cutoffs.week_starts().is_empty());
    assert_eq!(cutoffs.classify(today), Bucket::Recent);
  }

  #[test]
  fn test_week_starts_empty_when_recent_window_exceeds_trends() {
    let cutoffs = Cutoffs::new(today(), 120, 90);
    assert!(cutoffs.week_starts().is_empty());
  }

  #[test]
  fn test_partition_is_disjoint_and_complete() {
    // Arrange: one activity per day for 120 days plus two with bad dates
    let mut activities: Vec<ActivityRecord> = (0..120)
      .map(|days_ago| mock_activity("running", days_before(today(), days_ago), 5000.0, 1800.0))
      .collect();
    activities.push(ActivityRecord::new(json!({"activity_type": "running", "start_time": "soon"})));
    activities.push(ActivityRecord::new(json!({"activity_type": "running"})));
    let cutoffs = Cutoffs::new(today(), 14, 90);

    // Act
    let result = partition(&activities, &cutoffs);

    // Assert: days 0..=13 recent, 14..=89 historical, 90..=119 discarded
    assert_eq!(result.recent.len(), 14);
    assert_eq!(result.historical.len(), 76);
    assert_eq!(result.discarded, 30);
    assert_eq!(result.unparseable, 2);
    assert_eq!(
      result.recent.len() + result.historical.len() + result.discarded,
      activities.len() - result.unparseable
    );

    for activity in &result.recent {
      assert_eq!(cutoffs.classify(activity.date().unwrap()), Bucket::Recent);
    }
    for dated in &result.historical {
      assert_eq!(cutoffs.classify(dated.date), Bucket::Historical);
      assert_eq!(dated.activity.date(), Some(dated.date));
    }
  }

  #[test]
  fn test_partition_preserves_input_order() {
    let activities = vec![
      mock_activity_on("cycling", "2025-11-22T07:00:00Z"),
      mock_activity_on("running", "2025-11-15"),
      mock_activity_on("swimming", "2025-11-20T18:30:00+01:00"),
    ];
    let cutoffs = Cutoffs::new(today(), 14, 90);

    let result = partition(&activities, &cutoffs);

    let types: Vec<&str> = result.recent.iter().map(|a| a.activity_type()).collect();
    assert_eq!(types, vec!["cycling", "running", "swimming"]);
  }

  #[test]
  fn test_partition_empty() {
    let cutoffs = Cutoffs::new(today(), 14, 90);
    let result = partition(&[], &cutoffs);
    assert!(result.recent.is_empty());
    assert!(result.historical.is_empty());
    assert_eq!(result.discarded, 0);
  }
}
