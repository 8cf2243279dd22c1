//! Window configuration from the environment
//!
//! `CONTEXT_RECENT_DAYS` / `CONTEXT_TRENDS_DAYS`, optionally from a `.env`
//! file. Absent variables fall back to the defaults (14 / 90).

use chrono::NaiveDate;
use std::env;
use tracing::warn;

use crate::context::PrepareOptions;
use crate::error::{ContextError, Result};
use crate::window::{DEFAULT_RECENT_WINDOW_DAYS, DEFAULT_TRENDS_WINDOW_DAYS, MAX_WINDOW_DAYS};

pub const RECENT_DAYS_VAR: &str = "CONTEXT_RECENT_DAYS";
pub const TRENDS_DAYS_VAR: &str = "CONTEXT_TRENDS_DAYS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextConfig {
  pub recent_window_days: u32,
  pub trends_window_days: u32,
}

impl Default for ContextConfig {
  fn default() -> Self {
    Self {
      recent_window_days: DEFAULT_RECENT_WINDOW_DAYS,
      trends_window_days: DEFAULT_TRENDS_WINDOW_DAYS,
    }
  }
}

impl ContextConfig {
  pub fn from_env() -> Result<Self> {
    dotenvy::dotenv().ok();

    let config = Self {
      recent_window_days: read_days(RECENT_DAYS_VAR, DEFAULT_RECENT_WINDOW_DAYS)?,
      trends_window_days: read_days(TRENDS_DAYS_VAR, DEFAULT_TRENDS_WINDOW_DAYS)?,
    };
    config.validate()?;
    Ok(config)
  }

  /// Override individual windows (e.g. from CLI flags)
  pub fn with_overrides(mut self, recent: Option<u32>, trends: Option<u32>) -> Result<Self> {
    if let Some(days) = recent {
      self.recent_window_days = days;
    }
    if let Some(days) = trends {
      self.trends_window_days = days;
    }
    self.validate()?;
    Ok(self)
  }

  pub fn validate(&self) -> Result<()> {
    if self.recent_window_days == 0 {
      return Err(ContextError::config("recent window must be at least 1 day"));
    }
    if self.trends_window_days == 0 {
      return Err(ContextError::config("trends window must be at least 1 day"));
    }
    for (name, days) in [("recent", self.recent_window_days), ("trends", self.trends_window_days)] {
      if days > MAX_WINDOW_DAYS {
        return Err(ContextError::config(format!(
          "{} window of {} days exceeds the maximum of {} days",
          name, days, MAX_WINDOW_DAYS
        )));
      }
    }
    if self.recent_window_days > self.trends_window_days {
      warn!(
        recent_days = self.recent_window_days,
        trends_days = self.trends_window_days,
        "Recent window exceeds trends window"
      );
    }
    Ok(())
  }

  pub fn options_for(&self, reference_date: NaiveDate) -> PrepareOptions {
    PrepareOptions::for_date(reference_date)
      .with_windows(self.recent_window_days, self.trends_window_days)
  }
}

fn read_days(var: &str, default: u32) -> Result<u32> {
  match env::var(var) {
    Ok(raw) => raw
      .trim()
      .parse::<u32>()
      .map_err(|_| ContextError::config(format!("{} must be a positive integer, got {:?}", var, raw))),
    Err(env::VarError::NotPresent) => Ok(default),
    Err(env::VarError::NotUnicode(_)) => {
      Err(ContextError::config(format!("{} is not valid unicode", var)))
    }
  }
}
