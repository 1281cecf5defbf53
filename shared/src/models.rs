//! Data model for workout history, nutrition logs and derived summaries

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A logged workout session with its exercise entries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSession {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Workout template performed, `None` for ad hoc sessions
    pub workout_id: Option<Uuid>,
    /// Display name of the template, resolved by the store when it exists
    pub workout_name: Option<String>,
    /// Calendar day in the reporting timezone
    pub date: NaiveDate,
    pub exercises: Vec<SessionExerciseEntry>,
}

/// One exercise performed within a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionExerciseEntry {
    pub exercise_id: Uuid,
    /// Load used; `None` means a bodyweight or unweighted set
    pub weight_used: Option<f64>,
    pub sets_completed: Option<u32>,
    pub reps_completed: Option<u32>,
    /// Running personal record for (user, exercise) when this entry was written
    pub max_pr: Option<f64>,
}

/// Session handed to the store's write path, `max_pr` already resolved
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkoutSession {
    pub user_id: Uuid,
    pub workout_id: Option<Uuid>,
    pub date: NaiveDate,
    pub exercises: Vec<SessionExerciseEntry>,
}

/// Meal slot of a nutrition entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Other,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
            MealType::Other => "other",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = std::convert::Infallible;

    /// Unrecognised meal labels fall into `Other`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "breakfast" => MealType::Breakfast,
            "lunch" => MealType::Lunch,
            "dinner" => MealType::Dinner,
            "snack" | "snacks" => MealType::Snack,
            _ => MealType::Other,
        })
    }
}

/// One logged meal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NutritionLogEntry {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub total_calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub hydration: f64,
}

/// Per-day rollup of nutrition and workout activity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySummary {
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

/// Session count and estimated minutes for one workout type
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutTypeStats {
    pub count: u32,
    pub minutes: u32,
}

/// Seven-day rollup of daily summaries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklySummary {
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    /// Inclusive
    pub end_date: NaiveDate,
    pub daily_summaries: Vec<DailySummary>,
    pub total_calories_consumed: f64,
    pub average_daily_calories: f64,
    pub total_workout_sessions: u32,
    pub total_workout_minutes: u32,
    pub total_calories_burned: f64,
    /// Keyed by workout display name
    pub workout_type_distribution: BTreeMap<String, WorkoutTypeStats>,
    pub average_protein: f64,
    pub average_carbs: f64,
    pub average_fats: f64,
    pub average_hydration: f64,
}

/// Heaviest weight a user has ever logged for an exercise
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ExerciseMax {
    pub exercise_id: Uuid,
    pub max_weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonalBest {
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub max_weight: f64,
}
