//! Workout session repository for database operations

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Workout session record, joined with its template name
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workout_id: Option<Uuid>,
    pub workout_name: Option<String>,
    pub session_date: NaiveDate,
}

/// Exercise entry record within a session
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionEntryRecord {
    pub id: i64,
    pub session_id: Uuid,
    pub position: i32,
    pub exercise_id: Uuid,
    pub weight_used: Option<Decimal>,
    pub sets_completed: Option<i32>,
    pub reps_completed: Option<i32>,
    pub max_pr: Option<Decimal>,
}

/// Input for one entry of a new session
#[derive(Debug, Clone)]
pub struct CreateSessionEntry {
    pub exercise_id: Uuid,
    pub weight_used: Option<Decimal>,
    pub sets_completed: Option<i32>,
    pub reps_completed: Option<i32>,
    pub max_pr: Option<Decimal>,
}

/// Input for creating a session
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub user_id: Uuid,
    pub workout_id: Option<Uuid>,
    pub session_date: NaiveDate,
    pub entries: Vec<CreateSessionEntry>,
}

/// Workout session repository
pub struct SessionRepository;

impl SessionRepository {
    /// Distinct session dates for a user, most recent first
    pub async fn find_dates(pool: &PgPool, user_id: Uuid) -> Result<Vec<NaiveDate>> {
        let dates = sqlx::query_scalar::<_, NaiveDate>(
            r#"
            SELECT DISTINCT session_date
            FROM workout_sessions
            WHERE user_id = $1
            ORDER BY session_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(dates)
    }

    /// Sessions dated within `[start, end]`, oldest first
    pub async fn find_in_range(
        pool: &PgPool,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SessionRecord>> {
        let records = sqlx::query_as::<_, SessionRecord>(
            r#"
            SELECT ws.id, ws.user_id, ws.workout_id, w.name AS workout_name, ws.session_date
            FROM workout_sessions ws
            LEFT JOIN workouts w ON w.id = ws.workout_id
            WHERE ws.user_id = $1 AND ws.session_date >= $2 AND ws.session_date <= $3
            ORDER BY ws.session_date ASC, ws.created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Entries for a set of sessions, in logged order
    pub async fn find_entries(
        pool: &PgPool,
        session_ids: &[Uuid],
    ) -> Result<Vec<SessionEntryRecord>> {
        if session_ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = sqlx::query_as::<_, SessionEntryRecord>(
            r#"
            SELECT id, session_id, position, exercise_id, weight_used,
                   sets_completed, reps_completed, max_pr
            FROM session_exercises
            WHERE session_id = ANY($1)
            ORDER BY session_id, position ASC
            "#,
        )
        .bind(session_ids)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Create a session and its entries in one transaction
    pub async fn create(
        pool: &PgPool,
        input: CreateSession,
    ) -> Result<(SessionRecord, Vec<SessionEntryRecord>)> {
        let mut tx = pool.begin().await?;

        let session = sqlx::query_as::<_, SessionRecord>(
            r#"
            WITH inserted AS (
                INSERT INTO workout_sessions (user_id, workout_id, session_date)
                VALUES ($1, $2, $3)
                RETURNING id, user_id, workout_id, session_date
            )
            SELECT i.id, i.user_id, i.workout_id, w.name AS workout_name, i.session_date
            FROM inserted i
            LEFT JOIN workouts w ON w.id = i.workout_id
            "#,
        )
        .bind(input.user_id)
        .bind(input.workout_id)
        .bind(input.session_date)
        .fetch_one(&mut *tx)
        .await?;

        let mut entries = Vec::with_capacity(input.entries.len());
        for (position, entry) in input.entries.into_iter().enumerate() {
            let record = sqlx::query_as::<_, SessionEntryRecord>(
                r#"
                INSERT INTO session_exercises (session_id, position, exercise_id, weight_used,
                                               sets_completed, reps_completed, max_pr)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, session_id, position, exercise_id, weight_used,
                          sets_completed, reps_completed, max_pr
                "#,
            )
            .bind(session.id)
            .bind(position as i32)
            .bind(entry.exercise_id)
            .bind(entry.weight_used)
            .bind(entry.sets_completed)
            .bind(entry.reps_completed)
            .bind(entry.max_pr)
            .fetch_one(&mut *tx)
            .await?;
            entries.push(record);
        }

        tx.commit().await?;

        Ok((session, entries))
    }
}
