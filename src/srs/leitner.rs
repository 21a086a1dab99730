use crate::domain::Outcome;
use crate::error::Result;

/// Next bucket for an item after a review.
///
/// Retired items (`current_bucket >= retired_bucket`) stay retired whatever
/// the outcome. Otherwise Wrong resets to 0, Hard demotes by one (floor 0)
/// and Easy promotes by one (capped at `retired_bucket`).
pub fn update(current_bucket: u32, outcome: Outcome, retired_bucket: u32) -> u32 {
  if current_bucket >= retired_bucket {
    return retired_bucket;
  }

  match outcome {
    Outcome::Wrong => 0,
    Outcome::Hard => current_bucket.saturating_sub(1),
    Outcome::Easy => (current_bucket + 1).min(retired_bucket),
  }
}

/// `update` for an outcome that arrives as a raw label ("wrong", "hard", "easy").
pub fn update_from_label(current_bucket: u32, label: &str, retired_bucket: u32) -> Result<u32> {
  let outcome = Outcome::try_from(label)?;
  Ok(update(current_bucket, outcome, retired_bucket))
}
