/// Object Storage System
///
/// Durable storage for submitted pet images, addressed by path.
/// Supports a local disk backend and a Supabase-compatible HTTP backend.

pub mod disk;
pub mod path;
pub mod remote;

pub use disk::DiskObjectStore;
pub use path::{extension_for, object_path, validate_path};
pub use remote::RemoteObjectStore;

use crate::{
    config::{ObjectStoreConfig, ServerConfig},
    error::PetResult,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Object storage backend trait
///
/// `put` overwrites whatever is stored at `path`, so retrying a write is safe.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store bytes at a path
    async fn put(&self, path: &str, data: Vec<u8>, content_type: &str) -> PetResult<()>;

    /// Retrieve an object by path
    async fn get(&self, path: &str) -> PetResult<Option<Vec<u8>>>;

    /// Delete an object; deleting a missing object succeeds
    async fn delete(&self, path: &str) -> PetResult<()>;

    /// Check if an object exists
    async fn exists(&self, path: &str) -> PetResult<bool>;

    /// Public URL for a path. Pure: does not check that the object exists.
    fn public_url(&self, path: &str) -> String;

    /// Short backend name for logs and health output
    fn backend_name(&self) -> &'static str;
}

/// Build the configured object store backend
pub fn from_config(config: &ServerConfig) -> PetResult<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match &config.storage.objectstore {
        ObjectStoreConfig::Disk { location } => Arc::new(DiskObjectStore::new(
            location.clone(),
            config.service.public_url.clone(),
        )),
        ObjectStoreConfig::Remote {
            url,
            bucket,
            service_key,
        } => Arc::new(RemoteObjectStore::new(
            url.clone(),
            bucket.clone(),
            service_key.clone(),
            Duration::from_secs(config.intake.store_timeout_secs),
        )?),
    };

    tracing::info!("Object storage backend: {}", store.backend_name());

    Ok(store)
}
