//! API request and response types

use crate::models::{DailySummary, PersonalBest, WeeklySummary};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Streak and Personal Best Types
// ============================================================================

/// Current streak response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakResponse {
    pub streak: u32,
    /// Day the streak was computed for, in the reporting timezone
    pub as_of: NaiveDate,
}

/// One personal best row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalBestResponse {
    pub exercise_id: String,
    pub name: String,
    pub max_weight: f64,
}

impl From<PersonalBest> for PersonalBestResponse {
    fn from(best: PersonalBest) -> Self {
        Self {
            exercise_id: best.exercise_id.to_string(),
            name: best.exercise_name,
            max_weight: best.max_weight,
        }
    }
}

// ============================================================================
// Summary Types
// ============================================================================

/// Weekly summary query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklySummaryQuery {
    /// First day of the window; defaults to the current week's Sunday
    #[serde(default)]
    pub week_start: Option<NaiveDate>,
}

/// Daily summary range query parameters (inclusive)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRangeQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Daily summary response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySummaryResponse {
    pub date: NaiveDate,
    pub calorie_intake: f64,
    pub calorie_goal: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub hydration: f64,
    pub workout_minutes: u32,
    pub calories_burned: f64,
    pub workout_completed: bool,
}

impl From<DailySummary> for DailySummaryResponse {
    fn from(day: DailySummary) -> Self {
        Self {
            date: day.date,
            calorie_intake: day.calorie_intake,
            calorie_goal: day.calorie_goal,
            protein: day.protein,
            carbs: day.carbs,
            fats: day.fats,
            hydration: day.hydration,
            workout_minutes: day.workout_minutes,
            calories_burned: day.calories_burned,
            workout_completed: day.workout_completed,
        }
    }
}

/// Workout type slice for charting (`value` is the session count)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutTypeSlice {
    pub name: String,
    pub value: u32,
    pub minutes: u32,
}

/// Weekly summary response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySummaryResponse {
    pub user_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub daily_summaries: Vec<DailySummaryResponse>,
    pub total_calories_consumed: f64,
    pub average_daily_calories: f64,
    pub total_workout_sessions: u32,
    pub total_workout_minutes: u32,
    pub total_calories_burned: f64,
    /// Sorted by session count descending, then name
    pub workout_type_distribution: Vec<WorkoutTypeSlice>,
    pub average_protein: f64,
    pub average_carbs: f64,
    pub average_fats: f64,
    pub average_hydration: f64,
}

impl From<WeeklySummary> for WeeklySummaryResponse {
    fn from(summary: WeeklySummary) -> Self {
        let mut distribution: Vec<WorkoutTypeSlice> = summary
            .workout_type_distribution
            .into_iter()
            .map(|(name, stats)| WorkoutTypeSlice {
                name,
                value: stats.count,
                minutes: stats.minutes,
            })
            .collect();
        distribution.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));

        Self {
            user_id: summary.user_id.to_string(),
            start_date: summary.start_date,
            end_date: summary.end_date,
            daily_summaries: summary
                .daily_summaries
                .into_iter()
                .map(DailySummaryResponse::from)
                .collect(),
            total_calories_consumed: summary.total_calories_consumed,
            average_daily_calories: summary.average_daily_calories,
            total_workout_sessions: summary.total_workout_sessions,
            total_workout_minutes: summary.total_workout_minutes,
            total_calories_burned: summary.total_calories_burned,
            workout_type_distribution: distribution,
            average_protein: summary.average_protein,
            average_carbs: summary.average_carbs,
            average_fats: summary.average_fats,
            average_hydration: summary.average_hydration,
        }
    }
}

// ============================================================================
// Session Logging Types
// ============================================================================

/// Log a workout session request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogSessionRequest {
    #[serde(default)]
    pub workout_id: Option<Uuid>,
    /// Calendar day of the session in the reporting timezone
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 50, message = "A session needs 1 to 50 exercises"))]
    #[validate(nested)]
    pub exercises: Vec<LogExerciseEntryRequest>,
}

/// One exercise in a log session request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogExerciseEntryRequest {
    pub exercise_id: Uuid,
    /// Omit for bodyweight sets
    #[serde(default)]
    #[validate(range(min = 0.01, max = 2000.0))]
    pub weight_used: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 1, max = 100))]
    pub sets_completed: Option<u32>,
    #[serde(default)]
    #[validate(range(min = 1, max = 1000))]
    pub reps_completed: Option<u32>,
}

/// Logged exercise entry with its personal record snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedEntryResponse {
    pub exercise_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_used: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets_completed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps_completed: Option<u32>,
    pub max_pr: f64,
    pub is_new_record: bool,
}

/// Logged session response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSessionResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_id: Option<String>,
    pub date: NaiveDate,
    pub entries: Vec<LoggedEntryResponse>,
}
