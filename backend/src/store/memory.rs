//! In-memory session store
//!
//! Keeps everything in process behind a `tokio::sync::RwLock`. Entries get a
//! creation sequence number so "most recent entry" means the same thing it
//! does in PostgreSQL. `set_unavailable(true)` makes every call fail, which
//! lets tests exercise error propagation.

use super::SessionStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use fitness_progress_shared::errors::{AnalyticsError, AnalyticsResult};
use fitness_progress_shared::models::{
    ExerciseMax, NewWorkoutSession, NutritionLogEntry, SessionExerciseEntry, WorkoutSession,
};
use fitness_progress_shared::records::max_weight;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredSession {
    id: Uuid,
    user_id: Uuid,
    workout_id: Option<Uuid>,
    date: NaiveDate,
    entries: Vec<StoredEntry>,
}

#[derive(Debug, Clone)]
struct StoredEntry {
    seq: u64,
    entry: SessionExerciseEntry,
}

#[derive(Debug, Default)]
struct Inner {
    users: HashSet<Uuid>,
    calorie_goals: HashMap<Uuid, f64>,
    exercises: HashMap<Uuid, String>,
    workouts: HashMap<Uuid, String>,
    sessions: Vec<StoredSession>,
    nutrition: Vec<NutritionLogEntry>,
    next_seq: u64,
}

impl Inner {
    fn to_session(&self, stored: &StoredSession) -> WorkoutSession {
        WorkoutSession {
            id: stored.id,
            user_id: stored.user_id,
            workout_id: stored.workout_id,
            workout_name: stored
                .workout_id
                .and_then(|id| self.workouts.get(&id).cloned()),
            date: stored.date,
            exercises: stored.entries.iter().map(|e| e.entry.clone()).collect(),
        }
    }

    fn entries_for<'a>(
        &'a self,
        user_id: Uuid,
        exercise_id: Uuid,
    ) -> impl Iterator<Item = &'a StoredEntry> + 'a {
        self.sessions
            .iter()
            .filter(move |s| s.user_id == user_id)
            .flat_map(|s| s.entries.iter())
            .filter(move |e| e.entry.exercise_id == exercise_id)
    }
}

/// Session store held entirely in memory
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: RwLock<Inner>,
    unavailable: AtomicBool,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreUnavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn add_user(&self, user_id: Uuid) {
        self.inner.write().await.users.insert(user_id);
    }

    pub async fn set_calorie_goal(&self, user_id: Uuid, goal: f64) {
        self.inner.write().await.calorie_goals.insert(user_id, goal);
    }

    pub async fn add_exercise(&self, exercise_id: Uuid, name: impl Into<String>) {
        self.inner
            .write()
            .await
            .exercises
            .insert(exercise_id, name.into());
    }

    /// Drop an exercise from the catalog; logged history keeps referencing it
    pub async fn remove_exercise(&self, exercise_id: Uuid) {
        self.inner.write().await.exercises.remove(&exercise_id);
    }

    pub async fn add_workout(&self, workout_id: Uuid, name: impl Into<String>) {
        self.inner
            .write()
            .await
            .workouts
            .insert(workout_id, name.into());
    }

    pub async fn add_nutrition(&self, entry: NutritionLogEntry) {
        self.inner.write().await.nutrition.push(entry);
    }

    fn check_available(&self) -> AnalyticsResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AnalyticsError::store_unavailable(
                "in-memory store switched off",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn user_exists(&self, user_id: Uuid) -> AnalyticsResult<bool> {
        self.check_available()?;
        Ok(self.inner.read().await.users.contains(&user_id))
    }

    async fn find_session_dates(&self, user_id: Uuid) -> AnalyticsResult<Vec<NaiveDate>> {
        self.check_available()?;
        let inner = self.inner.read().await;
        let dates: BTreeSet<NaiveDate> = inner
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.date)
            .collect();
        Ok(dates.into_iter().rev().collect())
    }

    async fn find_sessions_in_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AnalyticsResult<Vec<WorkoutSession>> {
        self.check_available()?;
        let inner = self.inner.read().await;
        let mut sessions: Vec<WorkoutSession> = inner
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id && s.date >= start && s.date <= end)
            .map(|s| inner.to_session(s))
            .collect();
        sessions.sort_by_key(|s| s.date);
        Ok(sessions)
    }

    async fn find_nutrition_in_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AnalyticsResult<Vec<NutritionLogEntry>> {
        self.check_available()?;
        let inner = self.inner.read().await;
        Ok(inner
            .nutrition
            .iter()
            .filter(|n| n.user_id == user_id && n.date >= start && n.date <= end)
            .cloned()
            .collect())
    }

    async fn find_latest_max_pr(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
    ) -> AnalyticsResult<Option<f64>> {
        self.check_available()?;
        let inner = self.inner.read().await;
        Ok(inner
            .entries_for(user_id, exercise_id)
            .filter(|e| e.entry.max_pr.is_some())
            .max_by_key(|e| e.seq)
            .and_then(|e| e.entry.max_pr))
    }

    async fn find_max_weight_ever(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
    ) -> AnalyticsResult<Option<f64>> {
        self.check_available()?;
        let inner = self.inner.read().await;
        Ok(max_weight(
            inner
                .entries_for(user_id, exercise_id)
                .map(|e| e.entry.weight_used),
        ))
    }

    async fn get_user_nutrition_goal(&self, user_id: Uuid) -> AnalyticsResult<Option<f64>> {
        self.check_available()?;
        Ok(self.inner.read().await.calorie_goals.get(&user_id).copied())
    }

    async fn find_exercise_maxima(&self, user_id: Uuid) -> AnalyticsResult<Vec<ExerciseMax>> {
        self.check_available()?;
        let inner = self.inner.read().await;
        let mut maxima: HashMap<Uuid, f64> = HashMap::new();
        for stored in inner.sessions.iter().filter(|s| s.user_id == user_id) {
            for entry in &stored.entries {
                if let Some(weight) = entry.entry.weight_used {
                    let max = maxima.entry(entry.entry.exercise_id).or_insert(weight);
                    *max = max.max(weight);
                }
            }
        }
        Ok(maxima
            .into_iter()
            .map(|(exercise_id, max_weight)| ExerciseMax {
                exercise_id,
                max_weight,
            })
            .collect())
    }

    async fn find_exercise_names(
        &self,
        exercise_ids: &[Uuid],
    ) -> AnalyticsResult<HashMap<Uuid, String>> {
        self.check_available()?;
        let inner = self.inner.read().await;
        Ok(exercise_ids
            .iter()
            .filter_map(|id| inner.exercises.get(id).map(|name| (*id, name.clone())))
            .collect())
    }

    async fn insert_session(&self, session: NewWorkoutSession) -> AnalyticsResult<WorkoutSession> {
        self.check_available()?;
        let mut inner = self.inner.write().await;

        let mut entries = Vec::with_capacity(session.exercises.len());
        for entry in session.exercises {
            inner.next_seq += 1;
            entries.push(StoredEntry {
                seq: inner.next_seq,
                entry,
            });
        }

        let stored = StoredSession {
            id: Uuid::new_v4(),
            user_id: session.user_id,
            workout_id: session.workout_id,
            date: session.date,
            entries,
        };
        let created = inner.to_session(&stored);
        inner.sessions.push(stored);

        Ok(created)
    }
}
