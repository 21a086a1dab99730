//! Daily due-set selection.
//!
//! Bucket 0 is practiced every day; bucket `i` every `2^i` days
//! (bucket 1 every 2 days, bucket 2 every 4, bucket 3 every 8, ...).

use std::collections::HashSet;

use crate::domain::{BucketPartition, ItemId};
use crate::error::{LeitnerError, Result};

/// True if bucket `bucket` is practiced on `day`.
///
/// `day % 2^bucket == 0` is the same as `day` having at least `bucket`
/// trailing zero bits, which avoids overflowing `2^bucket` for deep buckets.
pub fn is_bucket_due(bucket: usize, day: u64) -> bool {
  bucket == 0 || (day != 0 && day.trailing_zeros() as usize >= bucket)
}

/// Items due for review on `day` (day 1 is the first day).
pub fn practice(partition: &BucketPartition, day: u64) -> Result<HashSet<ItemId>> {
  if day == 0 {
    return Err(LeitnerError::InvalidDay(day));
  }

  let mut todays_practice = HashSet::new();
  for (bucket, items) in partition.buckets().iter().enumerate() {
    if is_bucket_due(bucket, day) {
      todays_practice.extend(items.iter().cloned());
    }
  }

  tracing::debug!(day, due = todays_practice.len(), "Selected items for practice");
  Ok(todays_practice)
}
