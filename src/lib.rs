//! Training context preparation
//!
//! Condenses a raw training dataset (activities, recovery entries, current
//! markers) into a bounded context for downstream agents: recent activities
//! verbatim, older history as weekly aggregates, and a current-state snapshot.

pub mod coerce;
pub mod config;
pub mod context;
pub mod current;
pub mod dates;
pub mod error;
pub mod models;
pub mod overview;
pub mod weekly;
pub mod window;

#[cfg(test)]
mod test_utils;

pub use config::ContextConfig;
pub use context::{prepare, prepare_agent_context, ContextMetadata, PrepareOptions, PreparedContext};
pub use current::{CurrentMetrics, TrainingLoadSnapshot};
pub use error::{ContextError, Result};
pub use models::{ActivityRecord, RecoveryRecord, TrainingDataset};
pub use overview::{HistoryDepth, SizeReport, TrendOverview};
pub use weekly::{WeeklyAggregate, WeeklyTrend};
pub use window::{Cutoffs, DEFAULT_RECENT_WINDOW_DAYS, DEFAULT_TRENDS_WINDOW_DAYS, MAX_WINDOW_DAYS};
