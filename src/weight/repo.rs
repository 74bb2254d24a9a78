use anyhow::Context;
use axum::async_trait;
use time::Date;

use crate::db::PgRepo;
use crate::weight::repo_types::WeightRecord;

/// Every method is scoped by `user_id`; there is no unscoped read.
#[async_trait]
pub trait WeightRepo: Send + Sync {
    async fn insert_record(&self, user_id: i64, weight: f64, date: Date) -> anyhow::Result<i64>;
    /// Ordered by `date DESC, created_at DESC, id DESC`.
    async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<WeightRecord>>;
    async fn count_by_user(&self, user_id: i64) -> anyhow::Result<i64>;
    async fn latest_by_user(&self, user_id: i64) -> anyhow::Result<Option<WeightRecord>>;
}

#[async_trait]
impl WeightRepo for PgRepo {
    async fn insert_record(&self, user_id: i64, weight: f64, date: Date) -> anyhow::Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO weight_records (user_id, weight, date)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(weight)
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .context("insert weight record")?;
        Ok(id)
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<WeightRecord>> {
        let rows = sqlx::query_as::<_, WeightRecord>(
            r#"
            SELECT id, user_id, weight, date, created_at
              FROM weight_records
             WHERE user_id = $1
             ORDER BY date DESC, created_at DESC, id DESC
             LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("list weight records")?;
        Ok(rows)
    }

    async fn count_by_user(&self, user_id: i64) -> anyhow::Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM weight_records WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .context("count weight records")?;
        Ok(total)
    }

    async fn latest_by_user(&self, user_id: i64) -> anyhow::Result<Option<WeightRecord>> {
        let row = sqlx::query_as::<_, WeightRecord>(
            r#"
            SELECT id, user_id, weight, date, created_at
              FROM weight_records
             WHERE user_id = $1
             ORDER BY date DESC, created_at DESC, id DESC
             LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("latest weight record")?;
        Ok(row)
    }
}
