//! User repository for database operations

use anyhow::Result;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// User repository
pub struct UserRepository;

impl UserRepository {
    /// Check if a user exists
    pub async fn exists(pool: &PgPool, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Daily calorie goal from the user's settings, if one is set
    pub async fn calorie_goal(pool: &PgPool, user_id: Uuid) -> Result<Option<Decimal>> {
        let goal = sqlx::query_scalar::<_, Option<Decimal>>(
            r#"
            SELECT daily_calorie_goal FROM user_settings WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(goal.flatten())
    }
}
