/// Supabase-compatible HTTP object storage backend
use crate::{
    error::{PetError, PetResult},
    object_store::{validate_path, ObjectStore},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, error};

/// Remote storage backend speaking the Supabase storage REST API
///
/// Objects are written with `x-upsert: true` so a repeated write replaces
/// the previous object instead of failing.
#[derive(Clone)]
pub struct RemoteObjectStore {
    client: Client,
    base_url: String,
    bucket: String,
    service_key: String,
}

impl RemoteObjectStore {
    /// Create a new remote storage backend
    pub fn new(
        base_url: String,
        bucket: String,
        service_key: String,
        timeout: Duration,
    ) -> PetResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PetError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket,
            service_key,
        })
    }

    /// Authenticated object endpoint
    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
    }
}

/// The storage API answers 400 for some missing-object lookups
fn is_missing(status: StatusCode) -> bool {
    status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST
}

#[async_trait]
impl ObjectStore for RemoteObjectStore {
    async fn put(&self, path: &str, data: Vec<u8>, content_type: &str) -> PetResult<()> {
        validate_path(path)?;
        debug!("Uploading object: {} ({} bytes, type: {})", path, data.len(), content_type);

        let response = self
            .authorized(self.client.post(self.object_url(path)))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(data)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to upload object {}: {}", path, e);
                PetError::Storage(format!("Upload failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Object store rejected {}: {} {}", path, status, body);
            return Err(PetError::Storage(format!(
                "Upload rejected with status {}",
                status
            )));
        }

        Ok(())
    }

    async fn get(&self, path: &str) -> PetResult<Option<Vec<u8>>> {
        validate_path(path)?;

        let response = self
            .authorized(self.client.get(self.object_url(path)))
            .send()
            .await
            .map_err(|e| PetError::Storage(format!("Download failed: {}", e)))?;

        let status = response.status();
        if is_missing(status) {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(PetError::Storage(format!(
                "Download failed with status {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PetError::Storage(format!("Failed to read object body: {}", e)))?;
        Ok(Some(bytes.to_vec()))
    }

    async fn delete(&self, path: &str) -> PetResult<()> {
        validate_path(path)?;

        let response = self
            .authorized(self.client.delete(self.object_url(path)))
            .send()
            .await
            .map_err(|e| PetError::Storage(format!("Delete failed: {}", e)))?;

        let status = response.status();
        if status.is_success() || is_missing(status) {
            Ok(())
        } else {
            Err(PetError::Storage(format!(
                "Delete failed with status {}",
                status
            )))
        }
    }

    async fn exists(&self, path: &str) -> PetResult<bool> {
        validate_path(path)?;

        let response = self
            .authorized(self.client.head(self.object_url(path)))
            .send()
            .await
            .map_err(|e| PetError::Storage(format!("Existence check failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            Ok(true)
        } else if is_missing(status) {
            Ok(false)
        } else {
            Err(PetError::Storage(format!(
                "Existence check failed with status {}",
                status
            )))
        }
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }

    fn backend_name(&self) -> &'static str {
        "remote"
    }
}
