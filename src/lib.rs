//! Leitner-box spaced repetition: bucket partitioning, daily due sets,
//! outcome-driven bucket updates and learning progress statistics.
//!
//! Every scheduling function is pure; callers own the bucket assignment and
//! the review history and write results back between calls.

pub mod config;
pub mod domain;
pub mod error;
pub mod hint;
pub mod session;
pub mod srs;
pub mod stats;

pub use domain::{BucketAssignment, BucketPartition, ItemId, Outcome, ReviewEvent};
pub use error::{LeitnerError, Result};
pub use hint::get_hint;
pub use session::StudyDeck;
pub use srs::{get_bucket_range, is_bucket_due, practice, to_bucket_sets, update, update_from_label};
pub use stats::{
  compute_progress, compute_progress_from_json, compute_progress_with_config, ProgressSnapshot,
};
