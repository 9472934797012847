/// Report mutation
///
/// Applies caller-supplied status / payment changes to an existing report.
/// Status values are persisted verbatim; there is no transition graph.
use crate::{
    error::{PetError, PetResult},
    ids::ReportId,
    intake::pipeline::bounded,
    metrics,
    reports::{PetReport, ReportKind, ReportPatch, ReportStatus, ReportStore},
};
use serde::Deserialize;
use std::time::Duration;

/// PATCH body: `{ petId, status?, reward_paid? }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MutationRequest {
    #[serde(rename = "petId")]
    pub pet_id: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "rewardPaid")]
    pub reward_paid: Option<bool>,
    /// Collection holding the record; found reports when omitted
    pub kind: Option<ReportKind>,
}

impl MutationRequest {
    /// Validate and split into target and patch
    pub fn into_parts(self) -> PetResult<(ReportKind, ReportId, ReportPatch)> {
        let pet_id = self
            .pet_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| PetError::Validation("petId is required".to_string()))?;
        let id: ReportId = pet_id.parse()?;

        let patch = ReportPatch {
            status: self
                .status
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(ReportStatus::new),
            reward_paid: self.reward_paid,
        };
        if patch.is_empty() {
            return Err(PetError::Validation(
                "No updatable fields supplied".to_string(),
            ));
        }

        Ok((self.kind.unwrap_or(ReportKind::Found), id, patch))
    }
}

#[derive(Clone)]
pub struct MutationService {
    reports: ReportStore,
    store_timeout: Duration,
}

impl MutationService {
    pub fn new(reports: ReportStore, store_timeout: Duration) -> Self {
        Self {
            reports,
            store_timeout,
        }
    }

    /// Apply one partial update and return the updated record
    pub async fn apply(&self, request: MutationRequest) -> PetResult<PetReport> {
        let (kind, id, patch) = request.into_parts()?;

        let result = bounded(
            self.store_timeout,
            PetError::RecordStore("Report update timed out".to_string()),
            self.reports.update_by_id(kind, &id, &patch),
        )
        .await;

        match &result {
            Ok(report) => {
                metrics::record_mutation(kind.as_str(), "ok");
                tracing::info!(
                    report_id = %id,
                    status = %report.status,
                    reward_paid = report.reward_paid,
                    "report updated"
                );
            }
            Err(e) => {
                metrics::record_mutation(kind.as_str(), "error");
                tracing::warn!(report_id = %id, error = %e, "report update failed");
            }
        }

        result
    }
}
