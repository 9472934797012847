use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{error, info};

pub mod tasks;

/// Job scheduler for background tasks
pub struct JobScheduler {
    context: Arc<crate::context::AppContext>,
}

impl JobScheduler {
    pub fn new(context: Arc<crate::context::AppContext>) -> Self {
        Self { context }
    }

    /// Start all background jobs
    pub fn start(self: Arc<Self>) {
        info!("Starting background job scheduler");

        if self.context.config.sweep.enabled {
            tokio::spawn(Self::orphan_sweep_job(Arc::clone(&self)));
        } else {
            info!("Orphaned image sweep disabled");
        }

        tokio::spawn(Self::health_check_job(Arc::clone(&self)));

        info!("Background jobs started");
    }

    /// Remove images whose report was never recorded
    async fn orphan_sweep_job(scheduler: Arc<Self>) {
        let sweep = &scheduler.context.config.sweep;
        let mut interval = interval(Duration::from_secs(sweep.interval_secs.max(1)));

        loop {
            interval.tick().await;
            info!("Running orphaned image sweep");

            match tasks::sweep_orphans(&scheduler.context, sweep.orphan_ttl_secs).await {
                Ok(summary) => {
                    if summary.deleted > 0 || summary.failed > 0 {
                        info!(
                            deleted = summary.deleted,
                            kept = summary.kept,
                            failed = summary.failed,
                            "Orphaned image sweep finished"
                        );
                    } else {
                        info!("Orphan sweep: nothing to remove");
                    }
                }
                Err(e) => error!("Failed to sweep orphaned images: {}", e),
            }
        }
    }

    /// Health check job (runs every 5 minutes)
    async fn health_check_job(scheduler: Arc<Self>) {
        let mut interval = interval(Duration::from_secs(300));

        loop {
            interval.tick().await;

            if let Err(e) = tasks::health_check(&scheduler.context).await {
                error!("Health check failed: {}", e);
            }
        }
    }
}
