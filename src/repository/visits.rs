//! Dashboard visit tally repository.
//!
//! The visit counter is explicit data-store state rather than hidden
//! session state: one row per day, incremented atomically.

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

#[derive(Clone)]
pub struct VisitsRepository {
    pool: Pool<Postgres>,
}

impl VisitsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Record one visit for today and return today's tally
    pub async fn record(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO visits (visit_date, count)
            VALUES (CURRENT_DATE, 1)
            ON CONFLICT (visit_date) DO UPDATE SET count = visits.count + 1
            RETURNING count::bigint
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Total visits across all days
    pub async fn total(&self) -> AppResult<i64> {
        let total: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(count), 0)::bigint FROM visits")
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }
}
