use thiserror::Error;

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

/// Errors surfaced to callers of the context engine.
///
/// Noisy per-record telemetry never ends up here: unparseable dates,
/// non-numeric fields and half-filled recovery entries are skipped and
/// logged. Only contract violations (a dataset of the wrong shape, bad
/// configuration) and I/O around the engine are reported as errors.
#[derive(Error, Debug)]
pub enum ContextError {
  #[error("Malformed dataset: {0}")]
  MalformedDataset(String),

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Invalid date format: {0}. Expected YYYY-MM-DD")]
  InvalidDate(String),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ContextError>;

impl ContextError {
  pub fn malformed(msg: impl Into<String>) -> Self {
    Self::MalformedDataset(msg.into())
  }

  pub fn config(msg: impl Into<String>) -> Self {
    Self::Config(msg.into())
  }
}
