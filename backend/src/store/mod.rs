//! Session store: the read/write boundary of the analytics engine
//!
//! The engine never talks to PostgreSQL directly. Everything it needs from
//! persistence goes through [`SessionStore`], which has a PostgreSQL
//! implementation for the service and an in-memory one for tests and local
//! experiments.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;
use fitness_progress_shared::errors::AnalyticsResult;
use fitness_progress_shared::models::{
    ExerciseMax, NewWorkoutSession, NutritionLogEntry, WorkoutSession,
};
use std::collections::HashMap;
use uuid::Uuid;

pub use memory::InMemorySessionStore;
pub use postgres::PgSessionStore;

/// Persistence operations used by the analytics services
///
/// Every failure to reach the backing store surfaces as
/// `AnalyticsError::StoreUnavailable`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn user_exists(&self, user_id: Uuid) -> AnalyticsResult<bool>;

    /// Distinct session dates, most recent first
    async fn find_session_dates(&self, user_id: Uuid) -> AnalyticsResult<Vec<NaiveDate>>;

    /// Sessions dated within `[start, end]`, with their entries
    async fn find_sessions_in_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AnalyticsResult<Vec<WorkoutSession>>;

    /// Nutrition logs dated within `[start, end]`
    async fn find_nutrition_in_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AnalyticsResult<Vec<NutritionLogEntry>>;

    /// `max_pr` of the most recently written entry that carries one
    async fn find_latest_max_pr(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
    ) -> AnalyticsResult<Option<f64>>;

    async fn find_max_weight_ever(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
    ) -> AnalyticsResult<Option<f64>>;

    async fn get_user_nutrition_goal(&self, user_id: Uuid) -> AnalyticsResult<Option<f64>>;

    /// Heaviest weight per exercise, computed from raw entries
    async fn find_exercise_maxima(&self, user_id: Uuid) -> AnalyticsResult<Vec<ExerciseMax>>;

    /// Names of the given exercises; ids with no catalog row are omitted
    async fn find_exercise_names(
        &self,
        exercise_ids: &[Uuid],
    ) -> AnalyticsResult<HashMap<Uuid, String>>;

    /// Persist a session whose entries already carry their `max_pr`
    async fn insert_session(&self, session: NewWorkoutSession) -> AnalyticsResult<WorkoutSession>;
}
