use std::collections::{HashMap, HashSet};

/// Opaque key of a learning item. The item's content lives elsewhere.
pub type ItemId = String;

/// Item -> bucket number. Items missing from the map are implicitly in bucket 0.
pub type BucketAssignment = HashMap<ItemId, u32>;

/// Items grouped by bucket: index `i` holds every item currently in bucket `i`.
///
/// Always holds at least one (possibly empty) set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketPartition {
  buckets: Vec<HashSet<ItemId>>,
}

impl BucketPartition {
  /// Partition with `len` empty buckets (at least one)
  pub fn with_len(len: usize) -> Self {
    Self {
      buckets: vec![HashSet::new(); len.max(1)],
    }
  }

  pub fn len(&self) -> usize {
    self.buckets.len()
  }

  /// True when no bucket holds an item
  pub fn is_empty(&self) -> bool {
    self.buckets.iter().all(HashSet::is_empty)
  }

  pub fn bucket(&self, index: usize) -> Option<&HashSet<ItemId>> {
    self.buckets.get(index)
  }

  pub fn buckets(&self) -> &[HashSet<ItemId>] {
    &self.buckets
  }

  pub(crate) fn insert(&mut self, bucket: usize, item_id: ItemId) {
    if bucket >= self.buckets.len() {
      self.buckets.resize_with(bucket + 1, HashSet::new);
    }
    self.buckets[bucket].insert(item_id);
  }
}

impl Default for BucketPartition {
  fn default() -> Self {
    Self::with_len(1)
  }
}

impl From<Vec<HashSet<ItemId>>> for BucketPartition {
  fn from(buckets: Vec<HashSet<ItemId>>) -> Self {
    if buckets.is_empty() {
      return Self::default();
    }
    Self { buckets }
  }
}
