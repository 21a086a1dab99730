pub mod bucket;
pub mod review;

pub use bucket::{BucketAssignment, BucketPartition, ItemId};
pub use review::{Outcome, ReviewEvent};
