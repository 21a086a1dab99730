//! Regrouping a flat bucket assignment into per-bucket sets.

use crate::domain::{BucketAssignment, BucketPartition};

/// Convert an item -> bucket map into sets indexed by bucket number.
///
/// The result has `max bucket + 1` entries; an empty assignment yields a
/// single empty set rather than an empty sequence. One set is allocated per
/// bucket up to the highest, so bucket numbers are expected to stay small.
pub fn to_bucket_sets(assignment: &BucketAssignment) -> BucketPartition {
  let max_bucket = assignment.values().copied().max().unwrap_or(0);
  let mut partition = BucketPartition::with_len(max_bucket as usize + 1);

  for (item_id, &bucket) in assignment {
    partition.insert(bucket as usize, item_id.clone());
  }

  partition
}

/// Lowest and highest occupied bucket indices, or `(-1, -1)` when every
/// bucket is empty.
pub fn get_bucket_range(partition: &BucketPartition) -> (i64, i64) {
  let mut min_bucket = -1;
  let mut max_bucket = -1;

  for (i, bucket) in partition.buckets().iter().enumerate() {
    if bucket.is_empty() {
      continue;
    }
    if min_bucket == -1 {
      min_bucket = i as i64;
    }
    max_bucket = i as i64;
  }

  (min_bucket, max_bucket)
}
