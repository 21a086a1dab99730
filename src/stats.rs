//! Learning progress statistics derived from the bucket assignment and the
//! review history.
//!
//! Nothing here is persisted: a snapshot is recomputed whenever the
//! assignment or the history changes.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::config::SchedulerConfig;
use crate::domain::{BucketAssignment, ItemId, Outcome, ReviewEvent};
use crate::error::{LeitnerError, Result};

/// Aggregate view of a learner's progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub total_cards: usize,
    /// Item count per bucket, indices `0..=retired_bucket`
    pub cards_by_bucket: Vec<usize>,
    pub retired_cards: usize,
    /// Reviews per distinct reviewed item (0 without history)
    pub average_attempts: f64,
    pub most_difficult_cards: Vec<ItemId>,
    pub recent_improvements: Vec<ItemId>,
}

impl ProgressSnapshot {
    /// Share of all items held by each bucket, in percent
    pub fn bucket_distribution(&self) -> Vec<f64> {
        if self.total_cards == 0 {
            return vec![0.0; self.cards_by_bucket.len()];
        }
        self.cards_by_bucket
            .iter()
            .map(|&count| count as f64 / self.total_cards as f64 * 100.0)
            .collect()
    }

    pub fn is_retired_bucket(&self, bucket: usize) -> bool {
        bucket + 1 == self.cards_by_bucket.len()
    }
}

/// Compute progress with the default analyzer settings and the given retired bucket.
///
/// Allocates `retired_bucket + 1` counters, so the bound is expected to be small.
pub fn compute_progress(
    assignment: &BucketAssignment,
    history: &[ReviewEvent],
    retired_bucket: u32,
    now: DateTime<Utc>,
) -> ProgressSnapshot {
    let config = SchedulerConfig::with_retired_bucket(retired_bucket);
    compute_progress_with_config(assignment, history, &config, now)
}

/// Compute progress. `now` anchors the recent-improvement window.
pub fn compute_progress_with_config(
    assignment: &BucketAssignment,
    history: &[ReviewEvent],
    config: &SchedulerConfig,
    now: DateTime<Utc>,
) -> ProgressSnapshot {
    let retired = config.retired_bucket as usize;

    // Buckets above the retired bound are left out of the histogram
    let mut cards_by_bucket = vec![0; retired + 1];
    for &bucket in assignment.values() {
        if let Some(count) = cards_by_bucket.get_mut(bucket as usize) {
            *count += 1;
        }
    }
    let retired_cards = cards_by_bucket[retired];

    let by_item = group_by_item(history);
    let average_attempts = if by_item.is_empty() {
        0.0
    } else {
        history.len() as f64 / by_item.len() as f64
    };

    let most_difficult_cards = most_difficult(history, config.difficult_cards_limit);
    // A window reaching past the representable range covers all history
    let cutoff = Duration::try_days(config.improvement_window_days)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let recent_improvements = recent_improvements(by_item, cutoff);

    tracing::debug!(
        total = assignment.len(),
        retired = retired_cards,
        reviews = history.len(),
        improved = recent_improvements.len(),
        "Computed progress snapshot"
    );

    ProgressSnapshot {
        total_cards: assignment.len(),
        cards_by_bucket,
        retired_cards,
        average_attempts,
        most_difficult_cards,
        recent_improvements,
    }
}

/// Compute progress from untyped JSON input.
///
/// `assignment` must be an object mapping item ids to non-negative integer
/// buckets and `history` an array of review events; anything else is rejected
/// with `InvalidInput` and no partial result.
pub fn compute_progress_from_json(
    assignment: &Value,
    history: &Value,
    retired_bucket: u32,
    now: DateTime<Utc>,
) -> Result<ProgressSnapshot> {
    let assignment = parse_assignment(assignment)?;

    if !history.is_array() {
        return Err(LeitnerError::InvalidInput(
            "history must be an array".to_string(),
        ));
    }
    let history: Vec<ReviewEvent> = serde_json::from_value(history.clone())
        .map_err(|e| LeitnerError::InvalidInput(format!("history: {}", e)))?;

    Ok(compute_progress(&assignment, &history, retired_bucket, now))
}

fn parse_assignment(value: &Value) -> Result<BucketAssignment> {
    let Some(entries) = value.as_object() else {
        return Err(LeitnerError::InvalidInput(
            "assignment must be an object".to_string(),
        ));
    };

    entries
        .iter()
        .map(|(item_id, bucket)| {
            bucket
                .as_u64()
                .and_then(|b| u32::try_from(b).ok())
                .map(|b| (item_id.clone(), b))
                .ok_or_else(|| {
                    LeitnerError::InvalidInput(format!(
                        "bucket for {} must be a non-negative integer",
                        item_id
                    ))
                })
        })
        .collect()
}

/// Events of one item, in history order
struct ItemHistory<'a> {
    item_id: &'a str,
    events: Vec<&'a ReviewEvent>,
}

/// Group events by item, keeping items in order of first appearance
fn group_by_item(history: &[ReviewEvent]) -> Vec<ItemHistory<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut grouped: Vec<ItemHistory> = Vec::new();

    for event in history {
        let slot = *index.entry(event.item_id.as_str()).or_insert_with(|| {
            grouped.push(ItemHistory {
                item_id: event.item_id.as_str(),
                events: Vec::new(),
            });
            grouped.len() - 1
        });
        grouped[slot].events.push(event);
    }

    grouped
}

/// Items with the most Wrong answers, highest first.
///
/// Items never answered wrong are not ranked. Ties keep the order in which
/// each item's first Wrong answer appears in the history.
fn most_difficult(history: &[ReviewEvent], limit: usize) -> Vec<ItemId> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut wrong_counts: Vec<(&str, usize)> = Vec::new();

    for event in history.iter().filter(|e| e.outcome == Outcome::Wrong) {
        let id = event.item_id.as_str();
        match index.get(id) {
            Some(&slot) => wrong_counts[slot].1 += 1,
            None => {
                index.insert(id, wrong_counts.len());
                wrong_counts.push((id, 1));
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    wrong_counts.sort_by(|a, b| b.1.cmp(&a.1));
    wrong_counts
        .into_iter()
        .take(limit)
        .map(|(id, _)| id.to_string())
        .collect()
}

/// Items whose latest review is on or after `cutoff` and landed in a higher
/// bucket than some earlier review of the same item.
fn recent_improvements(by_item: Vec<ItemHistory<'_>>, cutoff: DateTime<Utc>) -> Vec<ItemId> {
    let mut improved = Vec::new();

    for mut item in by_item {
        if item.events.len() < 2 {
            continue;
        }
        item.events.sort_by_key(|e| e.timestamp);

        let Some((latest, earlier)) = item.events.split_last() else {
            continue;
        };
        if latest.timestamp < cutoff {
            continue;
        }

        if earlier.iter().rev().any(|prev| latest.bucket > prev.bucket) {
            tracing::trace!(item = item.item_id, bucket = latest.bucket, "Recent improvement");
            improved.push(item.item_id.to_string());
        }
    }

    improved
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn assignment(entries: &[(&str, u32)]) -> BucketAssignment {
        entries.iter().map(|(id, b)| (id.to_string(), *b)).collect()
    }

    fn event(id: &str, days_ago: i64, outcome: Outcome, bucket: u32) -> ReviewEvent {
        ReviewEvent::at(id, now() - Duration::days(days_ago), outcome, bucket)
    }

    #[test]
    fn test_empty_data() {
        let result = compute_progress(&BucketAssignment::new(), &[], 5, now());
        assert_eq!(
            result,
            ProgressSnapshot {
                total_cards: 0,
                cards_by_bucket: vec![0, 0, 0, 0, 0, 0],
                retired_cards: 0,
                average_attempts: 0.0,
                most_difficult_cards: vec![],
                recent_improvements: vec![],
            }
        );
    }

    #[test]
    fn test_actual_data() {
        let buckets = assignment(&[("card1", 0), ("card2", 1), ("card3", 5)]);
        let history = vec![
            event("card1", 0, Outcome::Wrong, 0),
            event("card2", 8, Outcome::Easy, 1),
            event("card3", 0, Outcome::Easy, 5),
        ];

        let result = compute_progress(&buckets, &history, 5, now());
        assert_eq!(result.total_cards, 3);
        assert_eq!(result.cards_by_bucket, vec![1, 1, 0, 0, 0, 1]);
        assert_eq!(result.retired_cards, 1);
        assert!((result.average_attempts - 1.0).abs() < f64::EPSILON);
        assert_eq!(result.most_difficult_cards, vec!["card1"]);
        assert!(result.recent_improvements.is_empty());
    }

    #[test]
    fn test_out_of_range_bucket_excluded_from_histogram() {
        let buckets = assignment(&[("card1", 2), ("card2", 9)]);
        let result = compute_progress(&buckets, &[], 3, now());

        assert_eq!(result.total_cards, 2);
        assert_eq!(result.cards_by_bucket, vec![0, 0, 1, 0]);
        assert_eq!(result.retired_cards, 0);
    }

    #[test]
    fn test_histogram_sized_by_retired_bound_only() {
        let buckets = assignment(&[("card1", 1), ("card2", u32::MAX)]);
        let result = compute_progress(&buckets, &[], 2, now());

        assert_eq!(result.cards_by_bucket, vec![0, 1, 0]);
        assert_eq!(result.total_cards, 2);
    }

    #[test]
    fn test_average_attempts_per_distinct_item() {
        let history = vec![
            event("a", 3, Outcome::Easy, 1),
            event("a", 2, Outcome::Easy, 2),
            event("a", 1, Outcome::Hard, 1),
            event("b", 1, Outcome::Easy, 1),
        ];
        let result = compute_progress(&BucketAssignment::new(), &history, 5, now());
        assert!((result.average_attempts - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_most_difficult_sorted_by_wrong_count() {
        let history = vec![
            event("a", 5, Outcome::Wrong, 0),
            event("b", 5, Outcome::Wrong, 0),
            event("b", 4, Outcome::Wrong, 0),
            event("c", 4, Outcome::Easy, 1),
        ];
        let result = compute_progress(&BucketAssignment::new(), &history, 5, now());
        // c never answered wrong, so it is not ranked at all
        assert_eq!(result.most_difficult_cards, vec!["b", "a"]);
    }

    #[test]
    fn test_most_difficult_ties_keep_first_wrong_order() {
        let history = vec![
            event("x", 9, Outcome::Easy, 1),
            event("y", 8, Outcome::Wrong, 0),
            event("x", 7, Outcome::Wrong, 0),
            event("z", 6, Outcome::Wrong, 0),
        ];
        let result = compute_progress(&BucketAssignment::new(), &history, 5, now());
        assert_eq!(result.most_difficult_cards, vec!["y", "x", "z"]);
    }

    #[test]
    fn test_most_difficult_limited_to_five() {
        let history: Vec<_> = (0..8)
            .map(|i| event(&format!("card{}", i), 1, Outcome::Wrong, 0))
            .collect();
        let result = compute_progress(&BucketAssignment::new(), &history, 5, now());
        assert_eq!(
            result.most_difficult_cards,
            vec!["card0", "card1", "card2", "card3", "card4"]
        );
    }

    #[test]
    fn test_recent_improvement_detected() {
        let history = vec![
            event("card1", 3, Outcome::Easy, 1),
            event("card1", 1, Outcome::Easy, 2),
        ];
        let result = compute_progress(&BucketAssignment::new(), &history, 5, now());
        assert_eq!(result.recent_improvements, vec!["card1"]);
    }

    #[test]
    fn test_improvement_uses_timestamp_order_not_history_order() {
        // Latest by timestamp is bucket 1, which is lower than the earlier 2
        let history = vec![
            event("card1", 1, Outcome::Hard, 1),
            event("card1", 3, Outcome::Easy, 2),
        ];
        let result = compute_progress(&BucketAssignment::new(), &history, 5, now());
        assert!(result.recent_improvements.is_empty());
    }

    #[test]
    fn test_improvement_outside_window_ignored() {
        let history = vec![
            event("card1", 20, Outcome::Easy, 1),
            event("card1", 8, Outcome::Easy, 2),
        ];
        let result = compute_progress(&BucketAssignment::new(), &history, 5, now());
        assert!(result.recent_improvements.is_empty());
    }

    #[test]
    fn test_improvement_window_boundary_inclusive() {
        let history = vec![
            event("card1", 10, Outcome::Easy, 1),
            event("card1", 7, Outcome::Easy, 2),
        ];
        let result = compute_progress(&BucketAssignment::new(), &history, 5, now());
        assert_eq!(result.recent_improvements, vec!["card1"]);
    }

    #[test]
    fn test_improvement_matches_any_earlier_lower_bucket() {
        // Early dip then plateau still counts
        let history = vec![
            event("card1", 6, Outcome::Wrong, 0),
            event("card1", 5, Outcome::Easy, 3),
            event("card1", 4, Outcome::Easy, 3),
            event("card1", 1, Outcome::Easy, 3),
        ];
        let result = compute_progress(&BucketAssignment::new(), &history, 5, now());
        assert_eq!(result.recent_improvements, vec!["card1"]);
    }

    #[test]
    fn test_single_event_never_improves() {
        let history = vec![event("card1", 0, Outcome::Easy, 1)];
        let result = compute_progress(&BucketAssignment::new(), &history, 5, now());
        assert!(result.recent_improvements.is_empty());
    }

    #[test]
    fn test_custom_config() {
        let config = SchedulerConfig {
            retired_bucket: 2,
            improvement_window_days: 1,
            difficult_cards_limit: 1,
        };
        let buckets = assignment(&[("a", 2), ("b", 2), ("c", 1)]);
        let history = vec![
            event("a", 3, Outcome::Wrong, 0),
            event("a", 2, Outcome::Easy, 1),
            event("b", 2, Outcome::Wrong, 0),
            event("b", 2, Outcome::Wrong, 0),
        ];

        let result = compute_progress_with_config(&buckets, &history, &config, now());
        assert_eq!(result.cards_by_bucket, vec![0, 1, 2]);
        assert_eq!(result.retired_cards, 2);
        assert_eq!(result.most_difficult_cards, vec!["b"]);
        // a's latest review is two days old, outside a one-day window
        assert!(result.recent_improvements.is_empty());
    }

    #[test]
    fn test_oversized_window_covers_all_history() {
        let history = vec![
            event("card1", 400, Outcome::Easy, 1),
            event("card1", 300, Outcome::Easy, 2),
        ];
        for days in [10_000_000_000, i64::MAX] {
            let config = SchedulerConfig {
                improvement_window_days: days,
                ..SchedulerConfig::default()
            };
            let result = compute_progress_with_config(&BucketAssignment::new(), &history, &config, now());
            assert_eq!(result.recent_improvements, vec!["card1"]);
        }
    }

    #[test]
    fn test_negative_window_finds_no_improvements() {
        let config = SchedulerConfig {
            improvement_window_days: -3,
            ..SchedulerConfig::default()
        };
        let history = vec![
            event("card1", 2, Outcome::Easy, 1),
            event("card1", 0, Outcome::Easy, 2),
        ];
        let result = compute_progress_with_config(&BucketAssignment::new(), &history, &config, now());
        assert!(result.recent_improvements.is_empty());
    }

    #[test]
    fn test_bucket_distribution() {
        let buckets = assignment(&[("a", 0), ("b", 0), ("c", 1), ("d", 5)]);
        let result = compute_progress(&buckets, &[], 5, now());
        assert_eq!(
            result.bucket_distribution(),
            vec![50.0, 25.0, 0.0, 0.0, 0.0, 25.0]
        );
        assert!(result.is_retired_bucket(5));
        assert!(!result.is_retired_bucket(4));
    }

    #[test]
    fn test_bucket_distribution_empty() {
        let result = compute_progress(&BucketAssignment::new(), &[], 3, now());
        assert_eq!(result.bucket_distribution(), vec![0.0; 4]);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let result = compute_progress(&BucketAssignment::new(), &[], 1, now());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["totalCards"], 0);
        assert_eq!(json["cardsByBucket"], json!([0, 0]));
        assert_eq!(json["mostDifficultCards"], json!([]));
    }

    // JSON entry point

    #[test]
    fn test_json_input() {
        let assignment = json!({ "card1": 0, "card2": 1 });
        let history = json!([
            { "itemId": "card1", "timestamp": "2024-06-15T10:00:00Z", "outcome": "wrong", "bucket": 0 }
        ]);

        let result = compute_progress_from_json(&assignment, &history, 5, now()).unwrap();
        assert_eq!(result.total_cards, 2);
        assert_eq!(result.cards_by_bucket, vec![1, 1, 0, 0, 0, 0]);
        assert_eq!(result.most_difficult_cards, vec!["card1"]);
    }

    #[test]
    fn test_json_rejects_non_object_assignment() {
        let err = compute_progress_from_json(&Value::Null, &json!([]), 5, now()).unwrap_err();
        assert!(matches!(err, LeitnerError::InvalidInput(_)));
        assert_eq!(err.user_message(), "Invalid input types");
    }

    #[test]
    fn test_json_rejects_non_array_history() {
        let err = compute_progress_from_json(&json!({}), &json!({}), 5, now()).unwrap_err();
        assert!(matches!(err, LeitnerError::InvalidInput(_)));
    }

    #[test]
    fn test_json_rejects_bad_bucket_value() {
        for bad in [json!(-1), json!(1.5), json!("2")] {
            let assignment = json!({ "card1": bad });
            let err = compute_progress_from_json(&assignment, &json!([]), 5, now()).unwrap_err();
            assert!(matches!(err, LeitnerError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_json_rejects_bad_outcome_in_history() {
        let history = json!([
            { "itemId": "card1", "timestamp": "2024-06-15T10:00:00Z", "outcome": "meh", "bucket": 0 }
        ]);
        let err = compute_progress_from_json(&json!({}), &history, 5, now()).unwrap_err();
        assert!(matches!(err, LeitnerError::InvalidInput(_)));
    }
}
