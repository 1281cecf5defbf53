//! Nutrition log repository

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Nutrition log row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NutritionLogRecord {
    pub user_id: Uuid,
    pub log_date: NaiveDate,
    pub meal_type: String,
    pub total_calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fats: Decimal,
    pub hydration: Decimal,
}

/// Nutrition log repository
pub struct NutritionLogRepository;

impl NutritionLogRepository {
    /// Logs dated within `[start, end]`
    pub async fn find_in_range(
        pool: &PgPool,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NutritionLogRecord>> {
        let records = sqlx::query_as::<_, NutritionLogRecord>(
            r#"
            SELECT user_id, log_date, meal_type, total_calories, protein, carbs, fats, hydration
            FROM nutrition_logs
            WHERE user_id = $1 AND log_date >= $2 AND log_date <= $3
            ORDER BY log_date ASC, created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}
