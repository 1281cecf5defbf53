//! Weekly summary cache
//!
//! Memoizes computed weekly summaries in Redis per (user, week start). The
//! cache is optional: with no connection every lookup is a miss, and Redis
//! failures are logged and treated as misses.

use chrono::NaiveDate;
use fitness_progress_shared::models::WeeklySummary;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct SummaryCache {
    conn: Option<ConnectionManager>,
    ttl: Duration,
}

impl SummaryCache {
    pub fn new(conn: Option<ConnectionManager>, ttl: Duration) -> Self {
        Self { conn, ttl }
    }

    /// Cache with no backing connection
    pub fn disabled() -> Self {
        Self {
            conn: None,
            ttl: Duration::ZERO,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.conn.is_some() && !self.ttl.is_zero()
    }

    pub fn key(user_id: Uuid, week_start: NaiveDate) -> String {
        format!("progress:weekly:{}:{}", user_id, week_start)
    }

    pub async fn get(&self, user_id: Uuid, week_start: NaiveDate) -> Option<WeeklySummary> {
        if !self.is_enabled() {
            return None;
        }
        let mut conn = self.conn.clone()?;
        let key = Self::key(user_id, week_start);

        let raw = match redis::cmd("GET")
            .arg(&key)
            .query_async::<_, Option<String>>(&mut conn)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(%key, "Summary cache read failed: {}", e);
                metrics::counter!("progress_summary_cache_total", "outcome" => "error")
                    .increment(1);
                return None;
            }
        };

        let summary = raw.and_then(|json| match serde_json::from_str::<WeeklySummary>(&json) {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(%key, "Discarding unreadable cached summary: {}", e);
                None
            }
        });

        let outcome = if summary.is_some() { "hit" } else { "miss" };
        metrics::counter!("progress_summary_cache_total", "outcome" => outcome).increment(1);
        debug!(%key, outcome, "Summary cache lookup");
        summary
    }

    pub async fn put(&self, summary: &WeeklySummary) {
        if !self.is_enabled() {
            return;
        }
        let Some(mut conn) = self.conn.clone() else {
            return;
        };
        let key = Self::key(summary.user_id, summary.start_date);

        let json = match serde_json::to_string(summary) {
            Ok(json) => json,
            Err(e) => {
                warn!(%key, "Failed to serialize summary for cache: {}", e);
                return;
            }
        };

        if let Err(e) = redis::cmd("SET")
            .arg(&key)
            .arg(json)
            .arg("EX")
            .arg(self.ttl.as_secs().max(1))
            .query_async::<_, ()>(&mut conn)
            .await
        {
            warn!(%key, "Summary cache write failed: {}", e);
        }
    }

    /// Drop the cached week starting at `week_start`
    pub async fn invalidate(&self, user_id: Uuid, week_start: NaiveDate) {
        let Some(mut conn) = self.conn.clone() else {
            return;
        };
        let key = Self::key(user_id, week_start);

        match redis::cmd("DEL")
            .arg(&key)
            .query_async::<_, i64>(&mut conn)
            .await
        {
            Ok(removed) if removed > 0 => info!(%key, "Invalidated cached weekly summary"),
            Ok(_) => {}
            Err(e) => warn!(%key, "Summary cache invalidation failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let user = Uuid::nil();
        let start = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(
            SummaryCache::key(user, start),
            "progress:weekly:00000000-0000-0000-0000-000000000000:2025-03-09"
        );
    }

    #[tokio::test]
    async fn test_disabled_cache_always_misses() {
        let cache = SummaryCache::disabled();
        assert!(!cache.is_enabled());
        let start = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert!(cache.get(Uuid::new_v4(), start).await.is_none());
        cache.invalidate(Uuid::new_v4(), start).await;
    }
}
