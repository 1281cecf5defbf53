//! Daily and weekly rollups of nutrition and workout history
//!
//! Workout time is estimated, not measured: every logged exercise counts as
//! a fixed number of minutes and every minute burns a fixed number of
//! calories (see [`WorkoutEstimates`]).

use crate::errors::{AnalyticsError, AnalyticsResult};
use crate::models::{
    DailySummary, NutritionLogEntry, WeeklySummary, WorkoutSession, WorkoutTypeStats,
};
use chrono::{Datelike, Days, NaiveDate};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Weekly windows always span exactly this many calendar days
pub const WEEK_LENGTH_DAYS: u64 = 7;

/// Calorie goal used when the user never configured one
pub const DEFAULT_CALORIE_GOAL: f64 = 2000.0;

/// Distribution label for sessions without a workout template
pub const NO_TYPE_LABEL: &str = "No Type";

/// Distribution label for a template whose name could not be resolved
pub const UNKNOWN_WORKOUT_LABEL: &str = "Unknown";

/// Fixed per-exercise time and per-minute burn estimates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutEstimates {
    pub minutes_per_exercise: u32,
    pub calories_per_minute: f64,
}

impl Default for WorkoutEstimates {
    fn default() -> Self {
        Self {
            minutes_per_exercise: 5,
            calories_per_minute: 5.0,
        }
    }
}

impl WorkoutEstimates {
    /// Estimated minutes for a number of logged exercises
    pub fn minutes_for(&self, exercise_count: usize) -> u32 {
        (exercise_count as u32).saturating_mul(self.minutes_per_exercise)
    }

    pub fn calories_for(&self, minutes: u32) -> f64 {
        minutes as f64 * self.calories_per_minute
    }
}

/// Sunday on or before `date`
///
/// Fails with `InvalidRange` when that Sunday precedes the earliest
/// representable date.
pub fn week_start_for(date: NaiveDate) -> AnalyticsResult<NaiveDate> {
    let days_from_sunday = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(days_from_sunday))
        .ok_or_else(|| AnalyticsError::InvalidRange {
            start: date,
            end: date,
            reason: "week start is before the earliest supported date".to_string(),
        })
}

/// Inclusive last day of the week starting at `start`
///
/// Fails with `InvalidRange` when the week runs past the latest
/// representable date.
pub fn week_end_for(start: NaiveDate) -> AnalyticsResult<NaiveDate> {
    start
        .checked_add_days(Days::new(WEEK_LENGTH_DAYS - 1))
        .ok_or_else(|| AnalyticsError::InvalidRange {
            start,
            end: NaiveDate::MAX,
            reason: "week ends after the latest supported date".to_string(),
        })
}

/// Resolve the `(start, end)` window of a weekly summary
///
/// Without an explicit start the window is the Sunday-based week containing
/// `today`.
pub fn weekly_window(
    week_start: Option<NaiveDate>,
    today: NaiveDate,
) -> AnalyticsResult<(NaiveDate, NaiveDate)> {
    let start = match week_start {
        Some(start) => start,
        None => week_start_for(today)?,
    };
    Ok((start, week_end_for(start)?))
}

/// Every calendar day from `start` to `end`, inclusive
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

/// Label a session is grouped under in the workout-type distribution
pub fn workout_label(session: &WorkoutSession) -> String {
    match (&session.workout_id, &session.workout_name) {
        (_, Some(name)) => name.clone(),
        (Some(_), None) => UNKNOWN_WORKOUT_LABEL.to_string(),
        (None, None) => NO_TYPE_LABEL.to_string(),
    }
}

/// Summary for one calendar day
///
/// Nutrition entries are summed across every meal of the day. Sessions and
/// entries dated on other days are ignored.
pub fn summarize_day(
    day: NaiveDate,
    sessions: &[WorkoutSession],
    nutrition: &[NutritionLogEntry],
    calorie_goal: f64,
    estimates: &WorkoutEstimates,
) -> DailySummary {
    let mut summary = DailySummary {
        date: day,
        calorie_intake: 0.0,
        calorie_goal,
        protein: 0.0,
        carbs: 0.0,
        fats: 0.0,
        hydration: 0.0,
        workout_minutes: 0,
        calories_burned: 0.0,
        workout_completed: false,
    };

    for entry in nutrition.iter().filter(|e| e.date == day) {
        summary.calorie_intake += entry.total_calories;
        summary.protein += entry.protein;
        summary.carbs += entry.carbs;
        summary.fats += entry.fats;
        summary.hydration += entry.hydration;
    }

    let day_sessions: Vec<&WorkoutSession> = sessions.iter().filter(|s| s.date == day).collect();
    let exercise_count: usize = day_sessions.iter().map(|s| s.exercises.len()).sum();

    summary.workout_minutes = estimates.minutes_for(exercise_count);
    summary.calories_burned = estimates.calories_for(summary.workout_minutes);
    summary.workout_completed = !day_sessions.is_empty();

    summary
}

/// Dense per-day summaries from `start` to `end`, inclusive
///
/// Every day in the range appears, including days with no data.
pub fn summarize_days(
    start: NaiveDate,
    end: NaiveDate,
    sessions: &[WorkoutSession],
    nutrition: &[NutritionLogEntry],
    calorie_goal: f64,
    estimates: &WorkoutEstimates,
) -> Vec<DailySummary> {
    days_in_range(start, end)
        .into_iter()
        .map(|day| summarize_day(day, sessions, nutrition, calorie_goal, estimates))
        .collect()
}

/// Session count and estimated minutes per workout label
pub fn workout_type_distribution(
    sessions: &[WorkoutSession],
    estimates: &WorkoutEstimates,
) -> BTreeMap<String, WorkoutTypeStats> {
    let mut distribution: BTreeMap<String, WorkoutTypeStats> = BTreeMap::new();
    for session in sessions {
        let stats = distribution.entry(workout_label(session)).or_default();
        stats.count += 1;
        stats.minutes += estimates.minutes_for(session.exercises.len());
    }
    distribution
}

/// Roll up the seven days starting at `start_date`
///
/// Averages divide by the window length, so days without data pull the
/// average down instead of being skipped.
pub fn compute_weekly_summary(
    user_id: Uuid,
    start_date: NaiveDate,
    sessions: &[WorkoutSession],
    nutrition: &[NutritionLogEntry],
    calorie_goal: f64,
    estimates: &WorkoutEstimates,
) -> AnalyticsResult<WeeklySummary> {
    let end_date = week_end_for(start_date)?;
    let daily_summaries = summarize_days(
        start_date,
        end_date,
        sessions,
        nutrition,
        calorie_goal,
        estimates,
    );

    let in_window: Vec<WorkoutSession> = sessions
        .iter()
        .filter(|s| s.date >= start_date && s.date <= end_date)
        .cloned()
        .collect();

    let days = daily_summaries.len() as f64;
    let total = |f: fn(&DailySummary) -> f64| daily_summaries.iter().map(f).sum::<f64>();

    let total_calories_consumed = total(|d| d.calorie_intake);
    let total_protein = total(|d| d.protein);
    let total_carbs = total(|d| d.carbs);
    let total_fats = total(|d| d.fats);
    let total_hydration = total(|d| d.hydration);
    let total_calories_burned = total(|d| d.calories_burned);
    let total_workout_minutes = daily_summaries.iter().map(|d| d.workout_minutes).sum();

    Ok(WeeklySummary {
        user_id,
        start_date,
        end_date,
        total_calories_consumed,
        average_daily_calories: total_calories_consumed / days,
        total_workout_sessions: in_window.len() as u32,
        total_workout_minutes,
        total_calories_burned,
        workout_type_distribution: workout_type_distribution(&in_window, estimates),
        average_protein: total_protein / days,
        average_carbs: total_carbs / days,
        average_fats: total_fats / days,
        average_hydration: total_hydration / days,
        daily_summaries,
    })
}
