use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::BestScore;
use sqlx::Row;

use crate::repository::{BestScoreRepository, StorageError};

use super::SqliteRepository;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[async_trait]
impl BestScoreRepository for SqliteRepository {
    async fn get_best(&self) -> Result<Option<BestScore>, StorageError> {
        let row = sqlx::query("SELECT percent, achieved_at FROM best_score WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let percent: i64 = row.try_get("percent").map_err(ser)?;
        let achieved_at: DateTime<Utc> = row.try_get("achieved_at").map_err(ser)?;
        let percent = u32::try_from(percent)
            .map_err(|_| StorageError::Serialization(format!("invalid percent: {percent}")))?;

        BestScore::new(percent, achieved_at).map(Some).map_err(ser)
    }

    async fn save_best(&self, score: &BestScore) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO best_score (id, percent, achieved_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                percent = excluded.percent,
                achieved_at = excluded.achieved_at
            ",
        )
        .bind(1_i64)
        .bind(i64::from(score.percent()))
        .bind(score.achieved_at())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
