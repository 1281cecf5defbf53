//! Exercise catalog and personal record queries

use anyhow::Result;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Exercise name lookup row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseNameRecord {
    pub id: Uuid,
    pub name: String,
}

/// Heaviest logged weight for one exercise
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseMaxRecord {
    pub exercise_id: Uuid,
    pub max_weight: Decimal,
}

/// Exercise catalog repository
pub struct ExerciseRepository;

impl ExerciseRepository {
    /// Names for the given exercise ids; unknown ids are simply absent
    pub async fn find_names(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<ExerciseNameRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = sqlx::query_as::<_, ExerciseNameRecord>(
            r#"SELECT id, name FROM exercises WHERE id = ANY($1)"#,
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}

/// Personal record queries over logged session entries
pub struct PersonalRecordRepository;

impl PersonalRecordRepository {
    /// `max_pr` of the most recently created entry that has one
    pub async fn latest_max_pr(
        pool: &PgPool,
        user_id: Uuid,
        exercise_id: Uuid,
    ) -> Result<Option<Decimal>> {
        let value = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT se.max_pr
            FROM session_exercises se
            JOIN workout_sessions ws ON ws.id = se.session_id
            WHERE ws.user_id = $1 AND se.exercise_id = $2 AND se.max_pr IS NOT NULL
            ORDER BY se.id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(exercise_id)
        .fetch_optional(pool)
        .await?;

        Ok(value)
    }

    /// Heaviest `weight_used` ever logged for the exercise
    pub async fn max_weight_ever(
        pool: &PgPool,
        user_id: Uuid,
        exercise_id: Uuid,
    ) -> Result<Option<Decimal>> {
        let value = sqlx::query_scalar::<_, Option<Decimal>>(
            r#"
            SELECT MAX(se.weight_used)
            FROM session_exercises se
            JOIN workout_sessions ws ON ws.id = se.session_id
            WHERE ws.user_id = $1 AND se.exercise_id = $2
            "#,
        )
        .bind(user_id)
        .bind(exercise_id)
        .fetch_one(pool)
        .await?;

        Ok(value)
    }

    /// Heaviest weight per exercise, recomputed from raw entries
    pub async fn maxima_by_exercise(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<ExerciseMaxRecord>> {
        let records = sqlx::query_as::<_, ExerciseMaxRecord>(
            r#"
            SELECT se.exercise_id, MAX(se.weight_used) AS max_weight
            FROM session_exercises se
            JOIN workout_sessions ws ON ws.id = se.session_id
            WHERE ws.user_id = $1 AND se.weight_used IS NOT NULL
            GROUP BY se.exercise_id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}
