use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ItemId;
use crate::error::LeitnerError;

/// Learner's self-reported recall quality for one review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
  Wrong, // Could not recall, back to bucket 0
  Hard,  // Recalled with effort, down one bucket
  Easy,  // Recalled easily, up one bucket
}

impl Outcome {
  pub const ALL: [Outcome; 3] = [Outcome::Wrong, Outcome::Hard, Outcome::Easy];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Wrong => "wrong",
      Self::Hard => "hard",
      Self::Easy => "easy",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "wrong" => Some(Self::Wrong),
      "hard" => Some(Self::Hard),
      "easy" => Some(Self::Easy),
      _ => None,
    }
  }

  /// Returns true if the item was recalled at all
  pub fn is_correct(&self) -> bool {
    matches!(self, Self::Hard | Self::Easy)
  }
}

impl TryFrom<&str> for Outcome {
  type Error = LeitnerError;

  fn try_from(value: &str) -> Result<Self, Self::Error> {
    Outcome::from_str(value).ok_or_else(|| LeitnerError::InvalidOutcome(value.to_string()))
  }
}

impl std::fmt::Display for Outcome {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One recorded review. Immutable once appended to the history.
///
/// `bucket` is the bucket the item landed in *after* this review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEvent {
  pub item_id: ItemId,
  pub timestamp: DateTime<Utc>,
  pub outcome: Outcome,
  pub bucket: u32,
}

impl ReviewEvent {
  pub fn new(item_id: impl Into<ItemId>, outcome: Outcome, bucket: u32) -> Self {
    Self::at(item_id, Utc::now(), outcome, bucket)
  }

  /// Create an event with an explicit timestamp
  pub fn at(
    item_id: impl Into<ItemId>,
    timestamp: DateTime<Utc>,
    outcome: Outcome,
    bucket: u32,
  ) -> Self {
    Self {
      item_id: item_id.into(),
      timestamp,
      outcome,
      bucket,
    }
  }
}
