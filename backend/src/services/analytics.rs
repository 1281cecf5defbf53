//! Progress analytics service
//!
//! Read-only operations over a user's logged history:
//! - Workout streak as of a reference day
//! - Personal bests per exercise
//! - Weekly summary (seven dense days plus totals and distribution)
//! - Daily summaries over an arbitrary bounded range
//!
//! Every operation first confirms the user exists and passes store errors
//! through unchanged.

use crate::store::SessionStore;
use chrono::NaiveDate;
use fitness_progress_shared::errors::{AnalyticsError, AnalyticsResult};
use fitness_progress_shared::models::{DailySummary, PersonalBest, WeeklySummary};
use fitness_progress_shared::records::personal_bests;
use fitness_progress_shared::streak::{compute_streak, distinct_dates_desc};
use fitness_progress_shared::validation::validate_range;
use fitness_progress_shared::weekly::{
    compute_weekly_summary, summarize_days, weekly_window, WorkoutEstimates, DEFAULT_CALORIE_GOAL,
};
use tracing::debug;
use uuid::Uuid;

/// Tunables applied when building daily and weekly summaries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummarySettings {
    /// Goal used when the user has none configured
    pub default_calorie_goal: f64,
    pub estimates: WorkoutEstimates,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            default_calorie_goal: DEFAULT_CALORIE_GOAL,
            estimates: WorkoutEstimates::default(),
        }
    }
}

/// Progress analytics service
pub struct AnalyticsService;

impl AnalyticsService {
    async fn ensure_user(store: &dyn SessionStore, user_id: Uuid) -> AnalyticsResult<()> {
        if store.user_exists(user_id).await? {
            Ok(())
        } else {
            Err(AnalyticsError::NotFound(format!("User {} not found", user_id)))
        }
    }

    async fn calorie_goal(
        store: &dyn SessionStore,
        user_id: Uuid,
        settings: &SummarySettings,
    ) -> AnalyticsResult<f64> {
        Ok(store
            .get_user_nutrition_goal(user_id)
            .await?
            .unwrap_or(settings.default_calorie_goal))
    }

    /// Consecutive workout days ending at `today`, tolerating one missed day
    ///
    /// Sessions dated after `today` are ignored.
    pub async fn get_streak(
        store: &dyn SessionStore,
        user_id: Uuid,
        today: NaiveDate,
    ) -> AnalyticsResult<u32> {
        metrics::counter!("progress_requests_total", "operation" => "streak").increment(1);
        Self::ensure_user(store, user_id).await?;

        let dates = store.find_session_dates(user_id).await?;
        let dates = distinct_dates_desc(dates.into_iter().filter(|d| *d <= today));
        let streak = compute_streak(&dates, today);

        debug!(%user_id, %today, streak, "Computed workout streak");
        Ok(streak)
    }

    /// Heaviest weight per exercise, ordered by exercise name
    pub async fn get_personal_bests(
        store: &dyn SessionStore,
        user_id: Uuid,
    ) -> AnalyticsResult<Vec<PersonalBest>> {
        metrics::counter!("progress_requests_total", "operation" => "personal_bests").increment(1);
        Self::ensure_user(store, user_id).await?;

        let maxima = store.find_exercise_maxima(user_id).await?;
        let ids: Vec<Uuid> = maxima.iter().map(|m| m.exercise_id).collect();
        let names = store.find_exercise_names(&ids).await?;
        let bests = personal_bests(maxima, &names);

        debug!(%user_id, count = bests.len(), "Computed personal bests");
        Ok(bests)
    }

    /// Summary of the week starting at `week_start`
    ///
    /// Without an explicit start, the week is the Sunday-based week
    /// containing `today`. The window is validated before the store is
    /// touched.
    pub async fn get_weekly_summary(
        store: &dyn SessionStore,
        user_id: Uuid,
        week_start: Option<NaiveDate>,
        today: NaiveDate,
        settings: &SummarySettings,
    ) -> AnalyticsResult<WeeklySummary> {
        metrics::counter!("progress_requests_total", "operation" => "weekly_summary").increment(1);
        let (start, end) = weekly_window(week_start, today)?;
        Self::ensure_user(store, user_id).await?;

        let sessions = store.find_sessions_in_range(user_id, start, end).await?;
        let nutrition = store.find_nutrition_in_range(user_id, start, end).await?;
        let calorie_goal = Self::calorie_goal(store, user_id, settings).await?;

        let summary = compute_weekly_summary(
            user_id,
            start,
            &sessions,
            &nutrition,
            calorie_goal,
            &settings.estimates,
        )?;

        debug!(
            %user_id,
            %start,
            sessions = summary.total_workout_sessions,
            calories = summary.total_calories_consumed,
            "Computed weekly summary"
        );
        Ok(summary)
    }

    /// One summary per day from `start` to `end`, inclusive
    ///
    /// The range is validated before the store is touched.
    pub async fn get_daily_summaries(
        store: &dyn SessionStore,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        settings: &SummarySettings,
    ) -> AnalyticsResult<Vec<DailySummary>> {
        metrics::counter!("progress_requests_total", "operation" => "daily_summaries").increment(1);
        validate_range(start, end)?;
        Self::ensure_user(store, user_id).await?;

        let sessions = store.find_sessions_in_range(user_id, start, end).await?;
        let nutrition = store.find_nutrition_in_range(user_id, start, end).await?;
        let calorie_goal = Self::calorie_goal(store, user_id, settings).await?;

        Ok(summarize_days(
            start,
            end,
            &sessions,
            &nutrition,
            calorie_goal,
            &settings.estimates,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemorySessionStore;
    use fitness_progress_shared::models::{NewWorkoutSession, SessionExerciseEntry};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn store_with_user() -> (InMemorySessionStore, Uuid) {
        let store = InMemorySessionStore::new();
        let user = Uuid::new_v4();
        store.add_user(user).await;
        (store, user)
    }

    async fn log_on(store: &InMemorySessionStore, user: Uuid, day: NaiveDate) {
        store
            .insert_session(NewWorkoutSession {
                user_id: user,
                workout_id: None,
                date: day,
                exercises: vec![SessionExerciseEntry {
                    exercise_id: Uuid::new_v4(),
                    weight_used: None,
                    sets_completed: None,
                    reps_completed: None,
                    max_pr: Some(0.0),
                }],
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_streak_ignores_future_sessions() {
        let (store, user) = store_with_user().await;
        let today = date(2025, 3, 10);
        log_on(&store, user, date(2025, 3, 12)).await;
        log_on(&store, user, today).await;
        log_on(&store, user, date(2025, 3, 9)).await;

        let streak = AnalyticsService::get_streak(&store, user, today).await.unwrap();
        assert_eq!(streak, 2);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let store = InMemorySessionStore::new();
        let err = AnalyticsService::get_streak(&store, Uuid::new_v4(), date(2025, 3, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_weekly_summary_defaults_to_current_week() {
        let (store, user) = store_with_user().await;
        // Wednesday
        let today = date(2025, 3, 12);

        let summary = AnalyticsService::get_weekly_summary(
            &store,
            user,
            None,
            today,
            &SummarySettings::default(),
        )
        .await
        .unwrap();

        assert_eq!(summary.start_date, date(2025, 3, 9));
        assert_eq!(summary.end_date, date(2025, 3, 15));
        assert_eq!(summary.daily_summaries.len(), 7);
        assert!(summary
            .daily_summaries
            .iter()
            .all(|d| d.calorie_goal == DEFAULT_CALORIE_GOAL));
    }

    #[tokio::test]
    async fn test_user_calorie_goal_overrides_default() {
        let (store, user) = store_with_user().await;
        store.set_calorie_goal(user, 2400.0).await;

        let days = AnalyticsService::get_daily_summaries(
            &store,
            user,
            date(2025, 3, 1),
            date(2025, 3, 3),
            &SummarySettings::default(),
        )
        .await
        .unwrap();

        assert_eq!(days.len(), 3);
        assert!(days.iter().all(|d| d.calorie_goal == 2400.0));
    }

    #[tokio::test]
    async fn test_daily_range_rejected_before_store_is_touched() {
        let (store, user) = store_with_user().await;
        store.set_unavailable(true);

        let err = AnalyticsService::get_daily_summaries(
            &store,
            user,
            date(2025, 3, 5),
            date(2025, 3, 1),
            &SummarySettings::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AnalyticsError::InvalidRange { .. }));
    }

    #[tokio::test]
    async fn test_weekly_window_past_calendar_end_rejected_before_store_is_touched() {
        let (store, user) = store_with_user().await;
        store.set_unavailable(true);

        let err = AnalyticsService::get_weekly_summary(
            &store,
            user,
            Some(NaiveDate::MAX - chrono::Duration::days(2)),
            date(2025, 3, 10),
            &SummarySettings::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AnalyticsError::InvalidRange { .. }));
    }
}
