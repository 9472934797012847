/// Upload intent ledger
///
/// An intent row is written before an image is stored and removed once the
/// report referencing it has been committed. Rows that outlive the TTL
/// point at images whose submission failed after the write.
use crate::{error::PetResult, ids::ReportId};
use chrono::{Duration, Utc};
use sqlx::{Row, SqlitePool};

#[derive(Clone)]
pub struct UploadLedger {
    db: SqlitePool,
}

/// A stale intent found by the sweep
#[derive(Debug, Clone, PartialEq)]
pub struct StaleUpload {
    pub storage_key: String,
    pub report_id: String,
}

impl UploadLedger {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Record that an image is about to be written at `storage_key`
    pub async fn record(&self, storage_key: &str, report_id: &ReportId) -> PetResult<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO upload_intent (storage_key, report_id, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(storage_key)
        .bind(report_id.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// The report referencing `storage_key` is committed
    pub async fn clear(&self, storage_key: &str) -> PetResult<()> {
        sqlx::query("DELETE FROM upload_intent WHERE storage_key = ?")
            .bind(storage_key)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Intents older than `ttl_secs`
    pub async fn list_stale(&self, ttl_secs: i64, limit: i64) -> PetResult<Vec<StaleUpload>> {
        let cutoff = (Utc::now() - Duration::seconds(ttl_secs)).to_rfc3339();

        let rows = sqlx::query(
            r#"
            SELECT storage_key, report_id
            FROM upload_intent
            WHERE created_at < ?
            ORDER BY created_at
            LIMIT ?
            "#,
        )
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(StaleUpload {
                    storage_key: row.try_get("storage_key")?,
                    report_id: row.try_get("report_id")?,
                })
            })
            .collect()
    }

    /// Number of open intents
    pub async fn pending(&self) -> PetResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM upload_intent")
            .fetch_one(&self.db)
            .await?;
        Ok(row.get("n"))
    }
}
