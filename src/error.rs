//! Error type shared by the scheduler, the progress analyzer and config loading.

use thiserror::Error;

/// Contract violations reported by the scheduling core.
///
/// None of these are retryable: the same inputs always produce the same error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeitnerError {
  /// Assignment or history did not have the expected shape.
  #[error("Invalid input types: {0}")]
  InvalidInput(String),
  /// Outcome label outside wrong/hard/easy.
  #[error("Unexpected difficulty level: {0}")]
  InvalidOutcome(String),
  /// Day counters start at 1.
  #[error("Invalid practice day {0}: days start at 1")]
  InvalidDay(u64),
  #[error("Config error: {0}")]
  Config(String),
}

impl LeitnerError {
  /// Returns a user-facing message that does not echo the offending input.
  pub fn user_message(&self) -> &'static str {
    match self {
      LeitnerError::InvalidInput(_) => "Invalid input types",
      LeitnerError::InvalidOutcome(_) => "Unknown answer difficulty",
      LeitnerError::InvalidDay(_) => "Practice day must be at least 1",
      LeitnerError::Config(_) => "Failed to load scheduler config",
    }
  }
}

pub type Result<T> = std::result::Result<T, LeitnerError>;
