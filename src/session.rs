//! In-memory study deck driving the daily practice loop.
//!
//! The deck plays the caller's role around the pure scheduling functions: it
//! owns the bucket assignment and the append-only review history, writes each
//! review's resulting bucket back, and re-derives the due list when the day
//! advances. Storage and presentation stay with whoever owns the deck.

use chrono::{DateTime, Utc};

use crate::config::SchedulerConfig;
use crate::domain::{BucketAssignment, ItemId, Outcome, ReviewEvent};
use crate::error::Result;
use crate::srs::{practice, to_bucket_sets, update};
use crate::stats::{compute_progress_with_config, ProgressSnapshot};

#[derive(Debug, Clone)]
pub struct StudyDeck {
  config: SchedulerConfig,
  assignment: BucketAssignment,
  history: Vec<ReviewEvent>,
  /// Current day, starting at 1
  day: u64,
  /// Items due today, sorted by id
  todays_practice: Vec<ItemId>,
  /// Index into `todays_practice` of the next item to review
  position: usize,
}

impl StudyDeck {
  pub fn new(config: SchedulerConfig) -> Self {
    Self {
      config,
      assignment: BucketAssignment::new(),
      history: Vec::new(),
      day: 1,
      todays_practice: Vec::new(),
      position: 0,
    }
  }

  pub fn day(&self) -> u64 {
    self.day
  }

  pub fn assignment(&self) -> &BucketAssignment {
    &self.assignment
  }

  pub fn history(&self) -> &[ReviewEvent] {
    &self.history
  }

  pub fn todays_practice(&self) -> &[ItemId] {
    &self.todays_practice
  }

  /// Number of today's items already answered
  pub fn completed_today(&self) -> usize {
    self.position
  }

  /// Bucket of an item; unknown items are new (bucket 0)
  pub fn bucket_of(&self, item_id: &str) -> u32 {
    self.assignment.get(item_id).copied().unwrap_or(0)
  }

  /// Add a new item in bucket 0. Returns false if the item already exists.
  ///
  /// Bucket 0 is due every day, so the item joins today's practice.
  pub fn add_item(&mut self, item_id: impl Into<ItemId>) -> bool {
    let item_id = item_id.into();
    if self.assignment.contains_key(&item_id) {
      return false;
    }
    self.assignment.insert(item_id.clone(), 0);
    self.todays_practice.push(item_id);
    true
  }

  pub fn current_item(&self) -> Option<&ItemId> {
    self.todays_practice.get(self.position)
  }

  pub fn is_practice_complete(&self) -> bool {
    self.position >= self.todays_practice.len()
  }

  /// Apply an outcome to any item and log it. Returns the recorded event.
  pub fn record_answer(
    &mut self,
    item_id: &str,
    outcome: Outcome,
    at: DateTime<Utc>,
  ) -> ReviewEvent {
    let current = self.bucket_of(item_id);
    let next = update(current, outcome, self.config.retired_bucket);
    self.assignment.insert(item_id.to_string(), next);

    tracing::debug!(item = item_id, %outcome, from = current, to = next, "Recorded answer");

    let event = ReviewEvent::at(item_id, at, outcome, next);
    self.history.push(event.clone());
    event
  }

  /// Answer the current item of today's practice and move to the next one.
  ///
  /// Returns None once today's practice is complete.
  pub fn answer_current(&mut self, outcome: Outcome, at: DateTime<Utc>) -> Option<ReviewEvent> {
    let item_id = self.current_item()?.clone();
    let event = self.record_answer(&item_id, outcome, at);
    self.position += 1;
    Some(event)
  }

  /// Move to the next day and rebuild the due list from the current buckets.
  pub fn advance_day(&mut self) -> Result<()> {
    self.day += 1;
    self.position = 0;

    let partition = to_bucket_sets(&self.assignment);
    let mut due: Vec<ItemId> = practice(&partition, self.day)?.into_iter().collect();
    due.sort();
    self.todays_practice = due;

    tracing::info!("Advanced to day {} ({} items due)", self.day, self.todays_practice.len());
    Ok(())
  }

  /// Replay today's due list from the start without advancing the day.
  ///
  /// The list itself is not recomputed, so items keep their place even if
  /// their buckets changed while answering.
  pub fn practice_again(&mut self) {
    self.position = 0;
    tracing::debug!("Restarted practice for day {}", self.day);
  }

  pub fn progress(&self, now: DateTime<Utc>) -> ProgressSnapshot {
    compute_progress_with_config(&self.assignment, &self.history, &self.config, now)
  }
}

impl Default for StudyDeck {
  fn default() -> Self {
    Self::new(SchedulerConfig::default())
  }
}
