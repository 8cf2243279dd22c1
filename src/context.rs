//! Context preparation for downstream agents
//!
//! Hybrid sliding window + aggregation:
//! - last `recent_window_days`: every activity, verbatim
//! - back to `trends_window_days`: one aggregate per calendar week
//! - latest physiological / training-load markers as a flat snapshot
//!
//! Preparation is a pure function of the dataset and the analysis date.
//! Nothing is cached between calls and the input is never mutated.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::current::CurrentMetrics;
use crate::error::Result;
use crate::models::{ActivityRecord, TrainingDataset};
use crate::weekly::{aggregate_weeks, WeeklyTrend};
use crate::window::{partition, Cutoffs, DEFAULT_RECENT_WINDOW_DAYS, DEFAULT_TRENDS_WINDOW_DAYS};

/// ---------------------------------------------------------------------------
/// Options
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrepareOptions {
  /// The analysis instant; "today" for window arithmetic
  pub reference_date: NaiveDate,
  pub recent_window_days: u32,
  pub trends_window_days: u32,
}

impl PrepareOptions {
  /// Default windows (14 days recent, 90 days trends) anchored at `reference_date`
  pub fn for_date(reference_date: NaiveDate) -> Self {
    Self {
      reference_date,
      recent_window_days: DEFAULT_RECENT_WINDOW_DAYS,
      trends_window_days: DEFAULT_TRENDS_WINDOW_DAYS,
    }
  }

  pub fn with_windows(mut self, recent_window_days: u32, trends_window_days: u32) -> Self {
    self.recent_window_days = recent_window_days;
    self.trends_window_days = trends_window_days;
    self
  }

  pub fn cutoffs(&self) -> Cutoffs {
    Cutoffs::new(self.reference_date, self.recent_window_days, self.trends_window_days)
  }
}

impl Default for PrepareOptions {
  /// Default windows anchored at today's local date
  fn default() -> Self {
    Self::for_date(Local::now().date_naive())
  }
}

/// ---------------------------------------------------------------------------
/// Prepared Context
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMetadata {
  pub preparation_date: NaiveDate,
  pub recent_window_days: u32,
  pub trends_window_days: u32,
}

/// The bounded summary handed to agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedContext {
  /// Activities inside the recent window, unmodified and in input order
  pub recent_activities: Vec<ActivityRecord>,

  /// One entry per week of the trends zone, oldest first
  pub weekly_trends: Vec<WeeklyTrend>,

  pub current_metrics: CurrentMetrics,

  pub metadata: ContextMetadata,
}

impl PreparedContext {
  pub fn to_value(&self) -> Result<Value> {
    Ok(serde_json::to_value(self)?)
  }

  /// Serialize for state injection or persistence
  pub fn to_json(&self, pretty: bool) -> Result<String> {
    let json = if pretty {
      serde_json::to_string_pretty(self)?
    } else {
      serde_json::to_string(self)?
    };
    Ok(json)
  }

  pub fn weeks_with_activity(&self) -> usize {
    self
      .weekly_trends
      .iter()
      .filter(|w| w.volume.total_activities > 0)
      .count()
  }
}

/// ---------------------------------------------------------------------------
/// Preparation
/// ---------------------------------------------------------------------------

/// Prepare an agent context from an already-validated dataset
pub fn prepare(dataset: &TrainingDataset, options: &PrepareOptions) -> PreparedContext {
  info!(
    date = %options.reference_date,
    recent_days = options.recent_window_days,
    trends_days = options.trends_window_days,
    "Preparing context"
  );
  if options.recent_window_days > options.trends_window_days {
    warn!(
      recent_days = options.recent_window_days,
      trends_days = options.trends_window_days,
      "Recent window is longer than the trends window; weekly trends will carry no activity"
    );
  }

  let cutoffs = options.cutoffs();
  let split = partition(&dataset.recent_activities, &cutoffs);

  let weekly_trends = aggregate_weeks(&split.historical, &dataset.recovery_indicators, &cutoffs)
    .iter()
    .map(|week| week.to_trend())
    .collect();

  PreparedContext {
    recent_activities: split.recent.into_iter().cloned().collect(),
    weekly_trends,
    current_metrics: CurrentMetrics::extract(dataset),
    metadata: ContextMetadata {
      preparation_date: options.reference_date,
      recent_window_days: options.recent_window_days,
      trends_window_days: options.trends_window_days,
    },
  }
}

/// Validate a raw dataset mapping, prepare it and return the output mapping
///
/// The only error is a dataset whose top-level shape is wrong; noisy
/// per-record data degrades silently.
pub fn prepare_agent_context(raw: &Value, options: &PrepareOptions) -> Result<Value> {
  let dataset = TrainingDataset::from_value(raw.clone())?;
  prepare(&dataset, options).to_value()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
