//! PostgreSQL-backed session store

use super::SessionStore;
use crate::repositories::{
    CreateSession, CreateSessionEntry, ExerciseRepository, NutritionLogRecord,
    NutritionLogRepository, PersonalRecordRepository, SessionEntryRecord, SessionRecord,
    SessionRepository, UserRepository,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use fitness_progress_shared::errors::{AnalyticsError, AnalyticsResult};
use fitness_progress_shared::models::{
    ExerciseMax, MealType, NewWorkoutSession, NutritionLogEntry, SessionExerciseEntry,
    WorkoutSession,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::error::{DatabaseError, ErrorKind};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{debug, warn};
use uuid::Uuid;

/// Session store over the service database
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Constraint and data errors are the caller's fault; everything else is an outage
fn store_error(err: anyhow::Error) -> AnalyticsError {
    if let Some(sqlx::Error::Database(db_err)) = err.downcast_ref::<sqlx::Error>() {
        if is_rejected_input(&**db_err) {
            debug!("Session store rejected input: {}", db_err);
            return AnalyticsError::Validation(db_err.message().to_string());
        }
    }
    warn!("Session store query failed: {:#}", err);
    AnalyticsError::store_unavailable(err)
}

fn is_rejected_input(db_err: &dyn DatabaseError) -> bool {
    let violation = matches!(
        db_err.kind(),
        ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation
    );
    // SQLSTATE class 22: data exceptions such as numeric overflow
    violation || db_err.code().is_some_and(|code| code.starts_with("22"))
}

fn decimal_to_f64(d: &Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

fn f64_to_decimal(value: f64) -> AnalyticsResult<Decimal> {
    Decimal::try_from(value)
        .map_err(|_| AnalyticsError::Validation(format!("{} is not a storable number", value)))
}

fn count_to_i32(value: u32) -> AnalyticsResult<i32> {
    i32::try_from(value)
        .map_err(|_| AnalyticsError::Validation(format!("{} is out of range", value)))
}

fn entry_from_record(record: &SessionEntryRecord) -> SessionExerciseEntry {
    SessionExerciseEntry {
        exercise_id: record.exercise_id,
        weight_used: record.weight_used.as_ref().map(decimal_to_f64),
        sets_completed: record.sets_completed.and_then(|v| u32::try_from(v).ok()),
        reps_completed: record.reps_completed.and_then(|v| u32::try_from(v).ok()),
        max_pr: record.max_pr.as_ref().map(decimal_to_f64),
    }
}

fn session_from_record(record: SessionRecord, entries: &[SessionEntryRecord]) -> WorkoutSession {
    WorkoutSession {
        id: record.id,
        user_id: record.user_id,
        workout_id: record.workout_id,
        workout_name: record.workout_name,
        date: record.session_date,
        exercises: entries
            .iter()
            .filter(|e| e.session_id == record.id)
            .map(entry_from_record)
            .collect(),
    }
}

fn nutrition_from_record(record: NutritionLogRecord) -> NutritionLogEntry {
    NutritionLogEntry {
        user_id: record.user_id,
        date: record.log_date,
        meal_type: record.meal_type.parse().unwrap_or(MealType::Other),
        total_calories: decimal_to_f64(&record.total_calories),
        protein: decimal_to_f64(&record.protein),
        carbs: decimal_to_f64(&record.carbs),
        fats: decimal_to_f64(&record.fats),
        hydration: decimal_to_f64(&record.hydration),
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn user_exists(&self, user_id: Uuid) -> AnalyticsResult<bool> {
        UserRepository::exists(&self.pool, user_id)
            .await
            .map_err(store_error)
    }

    async fn find_session_dates(&self, user_id: Uuid) -> AnalyticsResult<Vec<NaiveDate>> {
        SessionRepository::find_dates(&self.pool, user_id)
            .await
            .map_err(store_error)
    }

    async fn find_sessions_in_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AnalyticsResult<Vec<WorkoutSession>> {
        let records = SessionRepository::find_in_range(&self.pool, user_id, start, end)
            .await
            .map_err(store_error)?;
        let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
        let entries = SessionRepository::find_entries(&self.pool, &ids)
            .await
            .map_err(store_error)?;

        Ok(records
            .into_iter()
            .map(|record| session_from_record(record, &entries))
            .collect())
    }

    async fn find_nutrition_in_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AnalyticsResult<Vec<NutritionLogEntry>> {
        let records = NutritionLogRepository::find_in_range(&self.pool, user_id, start, end)
            .await
            .map_err(store_error)?;
        Ok(records.into_iter().map(nutrition_from_record).collect())
    }

    async fn find_latest_max_pr(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
    ) -> AnalyticsResult<Option<f64>> {
        let value = PersonalRecordRepository::latest_max_pr(&self.pool, user_id, exercise_id)
            .await
            .map_err(store_error)?;
        Ok(value.as_ref().map(decimal_to_f64))
    }

    async fn find_max_weight_ever(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
    ) -> AnalyticsResult<Option<f64>> {
        let value = PersonalRecordRepository::max_weight_ever(&self.pool, user_id, exercise_id)
            .await
            .map_err(store_error)?;
        Ok(value.as_ref().map(decimal_to_f64))
    }

    async fn get_user_nutrition_goal(&self, user_id: Uuid) -> AnalyticsResult<Option<f64>> {
        let goal = UserRepository::calorie_goal(&self.pool, user_id)
            .await
            .map_err(store_error)?;
        Ok(goal.as_ref().map(decimal_to_f64))
    }

    async fn find_exercise_maxima(&self, user_id: Uuid) -> AnalyticsResult<Vec<ExerciseMax>> {
        let records = PersonalRecordRepository::maxima_by_exercise(&self.pool, user_id)
            .await
            .map_err(store_error)?;
        Ok(records
            .into_iter()
            .map(|r| ExerciseMax {
                exercise_id: r.exercise_id,
                max_weight: decimal_to_f64(&r.max_weight),
            })
            .collect())
    }

    async fn find_exercise_names(
        &self,
        exercise_ids: &[Uuid],
    ) -> AnalyticsResult<HashMap<Uuid, String>> {
        let records = ExerciseRepository::find_names(&self.pool, exercise_ids)
            .await
            .map_err(store_error)?;
        Ok(records.into_iter().map(|r| (r.id, r.name)).collect())
    }

    async fn insert_session(&self, session: NewWorkoutSession) -> AnalyticsResult<WorkoutSession> {
        let mut entries = Vec::with_capacity(session.exercises.len());
        for entry in &session.exercises {
            entries.push(CreateSessionEntry {
                exercise_id: entry.exercise_id,
                weight_used: entry.weight_used.map(f64_to_decimal).transpose()?,
                sets_completed: entry.sets_completed.map(count_to_i32).transpose()?,
                reps_completed: entry.reps_completed.map(count_to_i32).transpose()?,
                max_pr: entry.max_pr.map(f64_to_decimal).transpose()?,
            });
        }

        let (record, entry_records) = SessionRepository::create(
            &self.pool,
            CreateSession {
                user_id: session.user_id,
                workout_id: session.workout_id,
                session_date: session.date,
                entries,
            },
        )
        .await
        .map_err(store_error)?;

        Ok(session_from_record(record, &entry_records))
    }
}
