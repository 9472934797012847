/// Disk-based object storage backend
use crate::{
    error::{PetError, PetResult},
    object_store::{validate_path, ObjectStore},
};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// Disk storage backend
///
/// Objects live at `{base}/{path}`; the path layout already spreads files
/// over one directory per report. Public URLs point at the service's own
/// `/objects/` route.
#[derive(Clone)]
pub struct DiskObjectStore {
    base_path: PathBuf,
    public_base_url: String,
}

impl DiskObjectStore {
    /// Create a new disk storage backend
    pub fn new(base_path: PathBuf, public_base_url: String) -> Self {
        Self {
            base_path,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn object_file(&self, path: &str) -> PetResult<PathBuf> {
        validate_path(path)?;
        Ok(self.base_path.join(path))
    }
}

#[async_trait]
impl ObjectStore for DiskObjectStore {
    async fn put(&self, path: &str, data: Vec<u8>, _content_type: &str) -> PetResult<()> {
        let file = self.object_file(path)?;
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                PetError::Storage(format!("Failed to create object directory: {}", e))
            })?;
        }

        // Write-then-rename so a reader never sees a half-written image
        let tmp = file.with_extension("partial");
        fs::write(&tmp, data)
            .await
            .map_err(|e| PetError::Storage(format!("Failed to write object {}: {}", path, e)))?;
        fs::rename(&tmp, &file)
            .await
            .map_err(|e| PetError::Storage(format!("Failed to commit object {}: {}", path, e)))?;

        Ok(())
    }

    async fn get(&self, path: &str) -> PetResult<Option<Vec<u8>>> {
        let file = self.object_file(path)?;

        match fs::read(&file).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PetError::Storage(format!(
                "Failed to read object {}: {}",
                path, e
            ))),
        }
    }

    async fn delete(&self, path: &str) -> PetResult<()> {
        let file = self.object_file(path)?;

        match fs::remove_file(&file).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PetError::Storage(format!(
                "Failed to delete object {}: {}",
                path, e
            ))),
        }
    }

    async fn exists(&self, path: &str) -> PetResult<bool> {
        let file = self.object_file(path)?;
        Ok(fs::try_exists(&file).await.unwrap_or(false))
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/objects/{}", self.public_base_url, path)
    }

    fn backend_name(&self) -> &'static str {
        "disk"
    }
}
