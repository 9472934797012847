/// Configuration management for the Lostpaw service
use crate::error::{PetError, PetResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub intake: IntakeConfig,
    pub sweep: SweepConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    /// Externally reachable base URL, used to build disk object URLs
    pub public_url: String,
    pub version: String,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub report_db: PathBuf,
    pub objectstore: ObjectStoreConfig,
}

/// Object storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObjectStoreConfig {
    Disk {
        location: PathBuf,
    },
    /// Supabase-compatible storage HTTP API
    Remote {
        url: String,
        bucket: String,
        service_key: String,
    },
}

/// Intake pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Maximum accepted image size in bytes
    pub max_image_bytes: usize,
    /// Upper bound for each store write, in seconds
    pub store_timeout_secs: u64,
}

/// Orphaned image sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    pub enabled: bool,
    pub interval_secs: u64,
    /// Age after which an unfinished upload is considered orphaned
    pub orphan_ttl_secs: i64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub writes_per_minute: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives
    pub level: String,
    pub json: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> PetResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("LOSTPAW_HOSTNAME").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("LOSTPAW_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| PetError::Validation("Invalid port number".to_string()))?;
        let public_url = env::var("LOSTPAW_PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port))
            .trim_end_matches('/')
            .to_string();
        let version = env!("CARGO_PKG_VERSION").to_string();

        let data_directory: PathBuf = env::var("LOSTPAW_DATA_DIRECTORY")
            .unwrap_or_else(|_| "./data".to_string())
            .into();
        let report_db = env::var("LOSTPAW_REPORT_DB_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("reports.sqlite"));

        let objectstore = if let Ok(url) = env::var("LOSTPAW_OBJECTSTORE_REMOTE_URL") {
            ObjectStoreConfig::Remote {
                url: url.trim_end_matches('/').to_string(),
                bucket: env::var("LOSTPAW_OBJECTSTORE_REMOTE_BUCKET")
                    .unwrap_or_else(|_| "pet-images".to_string()),
                service_key: env::var("LOSTPAW_OBJECTSTORE_REMOTE_KEY").map_err(|_| {
                    PetError::Validation("Remote object store key required".to_string())
                })?,
            }
        } else {
            ObjectStoreConfig::Disk {
                location: env::var("LOSTPAW_OBJECTSTORE_DISK_LOCATION")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| data_directory.join("objects")),
            }
        };

        let max_image_bytes = env::var("LOSTPAW_MAX_IMAGE_BYTES")
            .unwrap_or_else(|_| "10485760".to_string())
            .parse()
            .unwrap_or(10 * 1024 * 1024);
        let store_timeout_secs = env::var("LOSTPAW_STORE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let sweep_enabled = env::var("LOSTPAW_SWEEP_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);
        let sweep_interval_secs = env::var("LOSTPAW_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .unwrap_or(3600);
        let orphan_ttl_secs = env::var("LOSTPAW_SWEEP_ORPHAN_TTL_SECS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .unwrap_or(86400);

        let rate_limit_enabled = env::var("LOSTPAW_RATE_LIMITS_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);
        let writes_per_minute = env::var("LOSTPAW_RATE_LIMIT_WRITES_PER_MINUTE")
            .unwrap_or_else(|_| "120".to_string())
            .parse()
            .unwrap_or(120);

        let log_level = env::var("RUST_LOG")
            .unwrap_or_else(|_| "lostpaw=debug,tower_http=debug".to_string());
        let log_json = env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(ServerConfig {
            service: ServiceConfig {
                hostname,
                port,
                public_url,
                version,
            },
            storage: StorageConfig {
                data_directory,
                report_db,
                objectstore,
            },
            intake: IntakeConfig {
                max_image_bytes,
                store_timeout_secs,
            },
            sweep: SweepConfig {
                enabled: sweep_enabled,
                interval_secs: sweep_interval_secs,
                orphan_ttl_secs,
            },
            rate_limit: RateLimitConfig {
                enabled: rate_limit_enabled,
                writes_per_minute,
            },
            logging: LoggingConfig {
                level: log_level,
                json: log_json,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> PetResult<()> {
        if self.service.hostname.is_empty() {
            return Err(PetError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.intake.max_image_bytes == 0 {
            return Err(PetError::Validation(
                "Maximum image size must be greater than zero".to_string(),
            ));
        }

        if self.intake.store_timeout_secs == 0 {
            return Err(PetError::Validation(
                "Store timeout must be at least one second".to_string(),
            ));
        }

        if self.sweep.enabled
            && self.sweep.orphan_ttl_secs <= self.intake.store_timeout_secs as i64
        {
            return Err(PetError::Validation(
                "Orphan TTL must exceed the store timeout".to_string(),
            ));
        }

        if let ObjectStoreConfig::Remote { url, bucket, .. } = &self.storage.objectstore {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(PetError::Validation(format!(
                    "Remote object store URL must be http(s): {}",
                    url
                )));
            }
            if bucket.is_empty() {
                return Err(PetError::Validation("Bucket name cannot be empty".to_string()));
            }
        }

        Ok(())
    }

    /// Configuration suitable for tests: everything under `dir`, no sweep
    pub fn for_directory(dir: &std::path::Path) -> Self {
        ServerConfig {
            service: ServiceConfig {
                hostname: "127.0.0.1".to_string(),
                port: 0,
                public_url: "http://localhost:8080".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            storage: StorageConfig {
                data_directory: dir.to_path_buf(),
                report_db: dir.join("reports.sqlite"),
                objectstore: ObjectStoreConfig::Disk {
                    location: dir.join("objects"),
                },
            },
            intake: IntakeConfig {
                max_image_bytes: 10 * 1024 * 1024,
                store_timeout_secs: 30,
            },
            sweep: SweepConfig {
                enabled: false,
                interval_secs: 3600,
                orphan_ttl_secs: 86400,
            },
            rate_limit: RateLimitConfig {
                enabled: false,
                writes_per_minute: 120,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
            },
        }
    }
}
