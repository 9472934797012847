/// Background task implementations
use crate::{context::AppContext, error::PetResult, metrics};

/// Intents examined per sweep run
const SWEEP_BATCH: i64 = 500;

/// Outcome counts for one sweep run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepSummary {
    /// Orphaned objects removed
    pub deleted: u64,
    /// Intents whose report turned out to exist
    pub kept: u64,
    /// Deletions that failed; the intent stays for the next run
    pub failed: u64,
}

/// Health check - verify all systems are operational
pub async fn health_check(ctx: &AppContext) -> PetResult<()> {
    sqlx::query("SELECT 1").fetch_one(&ctx.db).await?;
    ctx.objects.exists("health/probe").await?;

    Ok(())
}

/// Delete images left behind by submissions that never produced a report
///
/// An object is only removed when no report in either collection
/// references its storage key.
pub async fn sweep_orphans(ctx: &AppContext, ttl_secs: i64) -> PetResult<SweepSummary> {
    let stale = ctx.uploads.list_stale(ttl_secs, SWEEP_BATCH).await?;
    let mut summary = SweepSummary::default();

    for upload in stale {
        if ctx.reports.storage_key_in_use(&upload.storage_key).await? {
            ctx.uploads.clear(&upload.storage_key).await?;
            metrics::record_sweep("kept");
            summary.kept += 1;
            continue;
        }

        match ctx.objects.delete(&upload.storage_key).await {
            Ok(()) => {
                ctx.uploads.clear(&upload.storage_key).await?;
                tracing::info!(
                    storage_key = %upload.storage_key,
                    report_id = %upload.report_id,
                    "Deleted orphaned image"
                );
                metrics::record_sweep("deleted");
                summary.deleted += 1;
            }
            Err(e) => {
                tracing::warn!(
                    storage_key = %upload.storage_key,
                    error = %e,
                    "Failed to delete orphaned image"
                );
                metrics::record_sweep("failed");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}
