//! Personal record rules
//!
//! Two paths coexist on purpose:
//! - every logged entry stores a `max_pr` snapshot, the running maximum at
//!   write time, which is never rewritten afterwards;
//! - personal bests are recomputed from raw `weight_used` values, so they
//!   stay correct even if a snapshot was skipped.

use crate::models::{ExerciseMax, PersonalBest};
use std::collections::HashMap;
use uuid::Uuid;

/// Name shown for an exercise reference that no longer resolves
pub const UNKNOWN_EXERCISE_NAME: &str = "Unknown";

/// Running maximum after logging `weight_used` on top of `prior_max`
///
/// An unweighted entry leaves the maximum unchanged.
pub fn next_max_pr(prior_max: f64, weight_used: Option<f64>) -> f64 {
    match weight_used {
        Some(weight) => prior_max.max(weight),
        None => prior_max,
    }
}

/// Whether `weight_used` beats the previous maximum
pub fn is_new_record(prior_max: f64, weight_used: Option<f64>) -> bool {
    weight_used.is_some_and(|weight| weight > prior_max)
}

/// One entry resolved against the running maximum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordOutcome {
    pub prior_max: f64,
    /// Running maximum including this entry
    pub max_pr: f64,
    pub is_new_record: bool,
}

impl RecordOutcome {
    pub fn resolve(prior_max: f64, weight_used: Option<f64>) -> Self {
        Self {
            prior_max,
            max_pr: next_max_pr(prior_max, weight_used),
            is_new_record: is_new_record(prior_max, weight_used),
        }
    }
}

/// Largest weight among the given entries, `None` when none were weighted
pub fn max_weight<I>(weights: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    weights.into_iter().flatten().reduce(f64::max)
}

/// Join per-exercise maxima with exercise names
///
/// Exercises missing from `names` get [`UNKNOWN_EXERCISE_NAME`] instead of
/// failing the whole list. Rows are ordered by name, then by id.
pub fn personal_bests(
    maxima: Vec<ExerciseMax>,
    names: &HashMap<Uuid, String>,
) -> Vec<PersonalBest> {
    let mut bests: Vec<PersonalBest> = maxima
        .into_iter()
        .map(|max| PersonalBest {
            exercise_id: max.exercise_id,
            exercise_name: names
                .get(&max.exercise_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_EXERCISE_NAME.to_string()),
            max_weight: max.max_weight,
        })
        .collect();

    bests.sort_by(|a, b| {
        a.exercise_name
            .cmp(&b.exercise_name)
            .then_with(|| a.exercise_id.cmp(&b.exercise_id))
    });
    bests
}
