//! CSV export of summary rows

use crate::error::ApiError;
use fitness_progress_shared::models::{DailySummary, WeeklySummary};
use serde::Serialize;

/// One CSV row per day
#[derive(Debug, Serialize)]
struct DailyCsvRow {
    date: String,
    calorie_intake: f64,
    calorie_goal: f64,
    protein: f64,
    carbs: f64,
    fats: f64,
    hydration: f64,
    workout_minutes: u32,
    calories_burned: f64,
    workout_completed: bool,
}

impl From<&DailySummary> for DailyCsvRow {
    fn from(day: &DailySummary) -> Self {
        Self {
            date: day.date.format("%Y-%m-%d").to_string(),
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

/// Export service
pub struct ExportService;

impl ExportService {
    /// The week's daily rows as CSV, header included
    pub fn weekly_csv(summary: &WeeklySummary) -> Result<String, ApiError> {
        let rows: Vec<DailyCsvRow> = summary.daily_summaries.iter().map(Into::into).collect();
        Self::to_csv(&rows)
    }

    /// Attachment name for a week's export
    pub fn weekly_filename(summary: &WeeklySummary) -> String {
        format!("progress-week-{}.csv", summary.start_date.format("%Y-%m-%d"))
    }

    fn to_csv<T: Serialize>(data: &[T]) -> Result<String, ApiError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record).map_err(|e| {
                ApiError::Internal(anyhow::anyhow!("CSV serialization error: {}", e))
            })?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV flush error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV encoding error: {}", e)))
    }
}
