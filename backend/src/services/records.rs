//! Personal record tracking and session logging
//!
//! Each logged entry stores `max_pr`, the running maximum weight for the
//! (user, exercise) pair at the moment it was written. Two concurrent logs
//! for the same pair can both read the same prior max; the later write does
//! not see the earlier one. Personal bests are recomputed from raw weights
//! and are unaffected.

use crate::store::SessionStore;
use chrono::NaiveDate;
use fitness_progress_shared::errors::{AnalyticsError, AnalyticsResult};
use fitness_progress_shared::models::{NewWorkoutSession, SessionExerciseEntry, WorkoutSession};
use fitness_progress_shared::records::RecordOutcome;
use fitness_progress_shared::types::{
    LogExerciseEntryRequest, LogSessionRequest, LogSessionResponse, LoggedEntryResponse,
};
use fitness_progress_shared::validation::validate_weight_used;
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Personal record tracker
pub struct PersonalRecordTracker;

impl PersonalRecordTracker {
    /// Maximum recorded before the entry being logged
    ///
    /// Uses the latest `max_pr` snapshot by creation order. Falls back to the
    /// heaviest raw weight when no snapshot exists, then to zero.
    pub async fn prior_max(
        store: &dyn SessionStore,
        user_id: Uuid,
        exercise_id: Uuid,
    ) -> AnalyticsResult<f64> {
        if let Some(max) = store.find_latest_max_pr(user_id, exercise_id).await? {
            return Ok(max);
        }
        Ok(store
            .find_max_weight_ever(user_id, exercise_id)
            .await?
            .unwrap_or(0.0))
    }

    /// Resolve a new entry against the stored history
    ///
    /// `max_pr` of the outcome is the value to store with the entry. An
    /// unweighted entry returns the existing max unchanged.
    pub async fn record_exercise(
        store: &dyn SessionStore,
        user_id: Uuid,
        exercise_id: Uuid,
        weight_used: Option<f64>,
    ) -> AnalyticsResult<RecordOutcome> {
        validate_weight_used(weight_used)?;
        let prior = Self::prior_max(store, user_id, exercise_id).await?;
        Ok(RecordOutcome::resolve(prior, weight_used))
    }
}

/// One exercise to log
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntryInput {
    pub exercise_id: Uuid,
    pub weight_used: Option<f64>,
    pub sets_completed: Option<u32>,
    pub reps_completed: Option<u32>,
}

/// A workout session to log
#[derive(Debug, Clone, PartialEq)]
pub struct LogSessionInput {
    pub workout_id: Option<Uuid>,
    pub date: NaiveDate,
    pub entries: Vec<LogEntryInput>,
}

impl From<LogExerciseEntryRequest> for LogEntryInput {
    fn from(req: LogExerciseEntryRequest) -> Self {
        Self {
            exercise_id: req.exercise_id,
            weight_used: req.weight_used,
            sets_completed: req.sets_completed,
            reps_completed: req.reps_completed,
        }
    }
}

impl From<LogSessionRequest> for LogSessionInput {
    fn from(req: LogSessionRequest) -> Self {
        Self {
            workout_id: req.workout_id,
            date: req.date,
            entries: req.exercises.into_iter().map(Into::into).collect(),
        }
    }
}

/// Stored session plus which entries set a new record
#[derive(Debug, Clone)]
pub struct LoggedSession {
    pub session: WorkoutSession,
    /// Parallel to `session.exercises`
    pub new_records: Vec<bool>,
}

impl LoggedSession {
    pub fn new_record_count(&self) -> usize {
        self.new_records.iter().filter(|r| **r).count()
    }
}

impl From<LoggedSession> for LogSessionResponse {
    fn from(logged: LoggedSession) -> Self {
        let entries = logged
            .session
            .exercises
            .iter()
            .zip(logged.new_records.iter())
            .map(|(entry, is_new)| LoggedEntryResponse {
                exercise_id: entry.exercise_id.to_string(),
                weight_used: entry.weight_used,
                sets_completed: entry.sets_completed,
                reps_completed: entry.reps_completed,
                max_pr: entry.max_pr.unwrap_or(0.0),
                is_new_record: *is_new,
            })
            .collect();

        Self {
            id: logged.session.id.to_string(),
            workout_id: logged.session.workout_id.map(|id| id.to_string()),
            date: logged.session.date,
            entries,
        }
    }
}

/// Session logging service
pub struct ProgressService;

impl ProgressService {
    /// Resolve every entry's `max_pr` and persist the session
    ///
    /// Entries are resolved in order. A repeated exercise within the same
    /// session builds on the max resolved for its earlier entry.
    pub async fn log_session(
        store: &dyn SessionStore,
        user_id: Uuid,
        input: LogSessionInput,
    ) -> AnalyticsResult<LoggedSession> {
        if !store.user_exists(user_id).await? {
            return Err(AnalyticsError::NotFound(format!("User {} not found", user_id)));
        }
        for entry in &input.entries {
            validate_weight_used(entry.weight_used)?;
        }

        let mut running: HashMap<Uuid, f64> = HashMap::new();
        let mut exercises = Vec::with_capacity(input.entries.len());
        let mut new_records = Vec::with_capacity(input.entries.len());

        for entry in input.entries {
            // Later entries for the same exercise build on this session's max
            let outcome = match running.get(&entry.exercise_id) {
                Some(max) => RecordOutcome::resolve(*max, entry.weight_used),
                None => {
                    PersonalRecordTracker::record_exercise(
                        store,
                        user_id,
                        entry.exercise_id,
                        entry.weight_used,
                    )
                    .await?
                }
            };
            running.insert(entry.exercise_id, outcome.max_pr);

            debug!(
                %user_id,
                exercise_id = %entry.exercise_id,
                prior = outcome.prior_max,
                max_pr = outcome.max_pr,
                is_new = outcome.is_new_record,
                "Resolved personal record"
            );

            exercises.push(SessionExerciseEntry {
                exercise_id: entry.exercise_id,
                weight_used: entry.weight_used,
                sets_completed: entry.sets_completed,
                reps_completed: entry.reps_completed,
                max_pr: Some(outcome.max_pr),
            });
            new_records.push(outcome.is_new_record);
        }

        let session = store
            .insert_session(NewWorkoutSession {
                user_id,
                workout_id: input.workout_id,
                date: input.date,
                exercises,
            })
            .await?;

        let logged = LoggedSession {
            session,
            new_records,
        };

        metrics::counter!("progress_sessions_logged_total").increment(1);
        metrics::counter!("progress_personal_records_total")
            .increment(logged.new_record_count() as u64);
        info!(
            %user_id,
            session_id = %logged.session.id,
            date = %logged.session.date,
            entries = logged.session.exercises.len(),
            new_records = logged.new_record_count(),
            "Workout session logged"
        );

        Ok(logged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemorySessionStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    fn lift(exercise_id: Uuid, weight: Option<f64>) -> LogEntryInput {
        LogEntryInput {
            exercise_id,
            weight_used: weight,
            sets_completed: Some(3),
            reps_completed: Some(5),
        }
    }

    async fn setup() -> (InMemorySessionStore, Uuid) {
        let store = InMemorySessionStore::new();
        let user = Uuid::new_v4();
        store.add_user(user).await;
        (store, user)
    }

    async fn log(
        store: &InMemorySessionStore,
        user: Uuid,
        date: NaiveDate,
        entries: Vec<LogEntryInput>,
    ) -> LoggedSession {
        ProgressService::log_session(
            store,
            user,
            LogSessionInput {
                workout_id: None,
                date,
                entries,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_first_entry_sets_record() {
        let (store, user) = setup().await;
        let squat = Uuid::new_v4();

        let logged = log(&store, user, day(1), vec![lift(squat, Some(100.0))]).await;
        assert_eq!(logged.session.exercises[0].max_pr, Some(100.0));
        assert_eq!(logged.new_records, vec![true]);
    }

    #[tokio::test]
    async fn test_lighter_entry_keeps_prior_max() {
        let (store, user) = setup().await;
        let squat = Uuid::new_v4();

        log(&store, user, day(1), vec![lift(squat, Some(100.0))]).await;
        let logged = log(&store, user, day(2), vec![lift(squat, Some(80.0))]).await;

        assert_eq!(logged.session.exercises[0].max_pr, Some(100.0));
        assert_eq!(logged.new_records, vec![false]);
    }

    #[tokio::test]
    async fn test_repeated_exercise_in_one_session_builds_on_itself() {
        let (store, user) = setup().await;
        let bench = Uuid::new_v4();

        let logged = log(
            &store,
            user,
            day(1),
            vec![
                lift(bench, Some(60.0)),
                lift(bench, Some(70.0)),
                lift(bench, Some(65.0)),
            ],
        )
        .await;

        let maxima: Vec<Option<f64>> = logged.session.exercises.iter().map(|e| e.max_pr).collect();
        assert_eq!(maxima, vec![Some(60.0), Some(70.0), Some(70.0)]);
        assert_eq!(logged.new_records, vec![true, true, false]);
    }

    #[tokio::test]
    async fn test_record_exercise_without_weight_returns_existing_max() {
        let (store, user) = setup().await;
        let pullup = Uuid::new_v4();

        let none_yet = PersonalRecordTracker::record_exercise(&store, user, pullup, None)
            .await
            .unwrap();
        assert_eq!(none_yet.max_pr, 0.0);

        log(&store, user, day(1), vec![lift(pullup, Some(20.0))]).await;
        let outcome = PersonalRecordTracker::record_exercise(&store, user, pullup, None)
            .await
            .unwrap();
        assert_eq!(outcome.max_pr, 20.0);
        assert!(!outcome.is_new_record);
    }

    #[tokio::test]
    async fn test_prior_max_falls_back_to_raw_weights() {
        let (store, user) = setup().await;
        let deadlift = Uuid::new_v4();
        store
            .insert_session(NewWorkoutSession {
                user_id: user,
                workout_id: None,
                date: day(1),
                exercises: vec![SessionExerciseEntry {
                    exercise_id: deadlift,
                    weight_used: Some(140.0),
                    sets_completed: Some(1),
                    reps_completed: Some(1),
                    max_pr: None,
                }],
            })
            .await
            .unwrap();

        let prior = PersonalRecordTracker::prior_max(&store, user, deadlift)
            .await
            .unwrap();
        assert_eq!(prior, 140.0);
    }

    #[tokio::test]
    async fn test_first_entry_per_exercise_resolves_against_stored_snapshot() {
        let (store, user) = setup().await;
        let press = Uuid::new_v4();
        store
            .insert_session(NewWorkoutSession {
                user_id: user,
                workout_id: None,
                date: day(1),
                exercises: vec![SessionExerciseEntry {
                    exercise_id: press,
                    weight_used: Some(40.0),
                    sets_completed: Some(3),
                    reps_completed: Some(8),
                    max_pr: Some(55.0),
                }],
            })
            .await
            .unwrap();

        let expected = PersonalRecordTracker::record_exercise(&store, user, press, Some(50.0))
            .await
            .unwrap();
        let logged = log(&store, user, day(2), vec![lift(press, Some(50.0))]).await;

        assert_eq!(logged.session.exercises[0].max_pr, Some(expected.max_pr));
        assert_eq!(logged.new_records, vec![expected.is_new_record]);
        assert_eq!(expected.max_pr, 55.0);
    }

    #[tokio::test]
    async fn test_non_positive_weight_rejected() {
        let (store, user) = setup().await;
        let err = ProgressService::log_session(
            &store,
            user,
            LogSessionInput {
                workout_id: None,
                date: day(1),
                entries: vec![lift(Uuid::new_v4(), Some(-5.0))],
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AnalyticsError::Validation(_)));
    }

    #[tokio::test]
    async fn test_response_flags_new_records() {
        let (store, user) = setup().await;
        let row = Uuid::new_v4();

        let logged = log(&store, user, day(3), vec![lift(row, Some(50.0)), lift(row, None)]).await;
        let response = LogSessionResponse::from(logged);

        assert_eq!(response.entries.len(), 2);
        assert!(response.entries[0].is_new_record);
        assert!(!response.entries[1].is_new_record);
        assert_eq!(response.entries[1].max_pr, 50.0);
        assert_eq!(response.date, day(3));
    }
}
