/// Intake pipeline: validate -> mint id -> store image -> insert report -> advance status
use crate::{
    error::{PetError, PetResult},
    ids::ReportId,
    intake::{ImagePart, IntakeForm, IntakeStage},
    metrics,
    object_store::{extension_for, object_path, ObjectStore},
    reports::{PetReport, ReportKind, ReportPatch, ReportStore, UploadLedger},
};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Orchestrates one submission across the object store and report store
#[derive(Clone)]
pub struct IntakeService {
    objects: Arc<dyn ObjectStore>,
    reports: ReportStore,
    uploads: UploadLedger,
    max_image_bytes: usize,
    store_timeout: Duration,
}

/// Sniff the image format, falling back to the declared content type
fn detect_content_type(part: &ImagePart) -> PetResult<String> {
    if let Ok(format) = image::guess_format(&part.data) {
        return Ok(format.to_mime_type().to_string());
    }

    match part.content_type.as_deref() {
        Some(declared) if declared.starts_with("image/") => Ok(declared.to_string()),
        _ => Err(PetError::Validation(
            "Uploaded file is not a recognised image".to_string(),
        )),
    }
}

/// Bound a store call; expiry is reported as `on_timeout`
pub(crate) async fn bounded<T, F>(limit: Duration, on_timeout: PetError, fut: F) -> PetResult<T>
where
    F: Future<Output = PetResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout),
    }
}

impl IntakeService {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        reports: ReportStore,
        uploads: UploadLedger,
        max_image_bytes: usize,
        store_timeout: Duration,
    ) -> Self {
        Self {
            objects,
            reports,
            uploads,
            max_image_bytes,
            store_timeout,
        }
    }

    /// Accept one submission and return the identifier of the new report
    pub async fn submit(&self, kind: ReportKind, form: IntakeForm) -> PetResult<ReportId> {
        let result = self.run(kind, form).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(PetError::MissingImage) => "missing_image",
            Err(PetError::Validation(_)) => "invalid",
            Err(PetError::Storage(_)) => "storage_error",
            Err(_) => "record_error",
        };
        metrics::record_intake(kind.as_str(), outcome);

        result
    }

    async fn run(&self, kind: ReportKind, mut form: IntakeForm) -> PetResult<ReportId> {
        // Nothing below this block may run for a rejected submission
        let image = match form.image.take() {
            Some(image) if !image.data.is_empty() => image,
            _ => return Err(PetError::MissingImage),
        };
        self.validate(&form, &image)?;
        let content_type = detect_content_type(&image)?;

        let id = ReportId::generate();
        let now = Utc::now();
        let ext = extension_for(image.file_name.as_deref(), &content_type);
        let storage_key = object_path(kind.category(), &id, now.timestamp_millis(), &ext);

        self.uploads.record(&storage_key, &id).await?;

        let size = image.data.len();
        bounded(
            self.store_timeout,
            PetError::Storage("Image upload timed out".to_string()),
            self.objects.put(&storage_key, image.data, &content_type),
        )
        .await
        .map_err(|e| {
            warn!(report_id = %id, storage_key = %storage_key, error = %e, "image write failed");
            match e {
                storage @ PetError::Storage(_) => storage,
                other => PetError::Storage(other.to_string()),
            }
        })?;
        metrics::record_image_bytes(size);

        let image_url = self.objects.public_url(&storage_key);

        let mut stage = IntakeStage::initial(kind);
        let contact = match kind {
            ReportKind::Found => form.contact,
            ReportKind::Search => Default::default(),
        };

        let report = PetReport {
            id,
            report_type: kind,
            image_url,
            storage_key: storage_key.clone(),
            pet_type: form.pet_type,
            breeds: form.breeds,
            colors: form.colors,
            distinctive_features: form.distinctive_features,
            size: form.size,
            age: form.age,
            gender: form.gender,
            location: form.location,
            coordinates: form.coordinates,
            description: form.description,
            pet_date: form.date.unwrap_or_else(|| now.date_naive()),
            contact,
            status: stage.status(),
            reward: form.reward,
            reward_claim: form.reward_claim,
            reward_paid: false,
            created_at: now,
            updated_at: now,
        };

        bounded(
            self.store_timeout,
            PetError::RecordStore("Report insert timed out".to_string()),
            self.reports.insert(&report),
        )
        .await?;

        // Matching or other post-processing would run before each advance
        while let Some(next) = stage.next() {
            bounded(
                self.store_timeout,
                PetError::RecordStore("Report status update timed out".to_string()),
                self.reports
                    .update_by_id(kind, &id, &ReportPatch::status(next.status())),
            )
            .await?;
            stage = next;
        }

        if let Err(e) = self.uploads.clear(&storage_key).await {
            // The sweep checks report references before deleting, so this is safe to leave
            warn!(storage_key = %storage_key, error = %e, "failed to clear upload intent");
        }

        info!(
            report_id = %id,
            kind = %kind,
            status = %stage.status(),
            "intake completed"
        );

        Ok(id)
    }

    /// Checks that must pass before any side effect
    fn validate(&self, form: &IntakeForm, image: &ImagePart) -> PetResult<()> {
        if image.data.len() > self.max_image_bytes {
            return Err(PetError::Validation(format!(
                "Image exceeds maximum size of {} bytes",
                self.max_image_bytes
            )));
        }
        if form.pet_type.is_empty() {
            return Err(PetError::Validation("petType is required".to_string()));
        }
        if form.colors.is_empty() {
            return Err(PetError::Validation(
                "At least one color is required".to_string(),
            ));
        }
        Ok(())
    }
}
