/// Application context and dependency injection
use crate::{
    community::CommunityStore,
    config::{ObjectStoreConfig, ServerConfig},
    db,
    error::{PetError, PetResult},
    intake::IntakeService,
    mutation::MutationService,
    object_store::{self, ObjectStore},
    rate_limit::RateLimiter,
    reports::{ReportStore, UploadLedger},
};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub db: SqlitePool,
    pub objects: Arc<dyn ObjectStore>,
    pub reports: ReportStore,
    pub uploads: UploadLedger,
    pub intake: IntakeService,
    pub mutation: MutationService,
    pub community: CommunityStore,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> PetResult<Self> {
        config.validate()?;

        Self::ensure_directories(&config).await?;

        let db = db::create_pool(&config.storage.report_db, db::DatabaseOptions::default()).await?;
        db::run_migrations(&db).await?;
        db::test_connection(&db).await?;

        let objects = object_store::from_config(&config)?;

        Ok(Self::from_parts(config, db, objects))
    }

    /// Wire services over an existing pool and object store
    pub fn from_parts(config: ServerConfig, db: SqlitePool, objects: Arc<dyn ObjectStore>) -> Self {
        let store_timeout = Duration::from_secs(config.intake.store_timeout_secs);

        let reports = ReportStore::new(db.clone());
        let uploads = UploadLedger::new(db.clone());
        let intake = IntakeService::new(
            Arc::clone(&objects),
            reports.clone(),
            uploads.clone(),
            config.intake.max_image_bytes,
            store_timeout,
        );
        let mutation = MutationService::new(reports.clone(), store_timeout);
        let community = CommunityStore::new(db.clone());
        let rate_limiter = Arc::new(RateLimiter::new(&config.rate_limit));

        Self {
            config: Arc::new(config),
            db,
            objects,
            reports,
            uploads,
            intake,
            mutation,
            community,
            rate_limiter,
        }
    }

    /// Ensure required directories exist
    async fn ensure_directories(config: &ServerConfig) -> PetResult<()> {
        let data_dir = &config.storage.data_directory;
        if !data_dir.exists() {
            tokio::fs::create_dir_all(data_dir).await.map_err(|e| {
                PetError::Internal(format!("Failed to create directory {:?}: {}", data_dir, e))
            })?;
        }

        if let ObjectStoreConfig::Disk { location } = &config.storage.objectstore {
            tokio::fs::create_dir_all(location).await?;
        }

        Ok(())
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!(
            "{}:{}",
            self.config.service.hostname, self.config.service.port
        )
    }
}
