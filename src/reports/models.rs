/// Report data models
use crate::ids::ReportId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which collection a report belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    /// Owner searching for a lost pet
    #[serde(rename = "lost", alias = "search")]
    Search,
    /// Someone reporting a pet they found
    #[serde(rename = "found", alias = "report")]
    Found,
}

impl ReportKind {
    /// Value stored in `report_type`
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Search => "lost",
            ReportKind::Found => "found",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            ReportKind::Search => "pet_searches",
            ReportKind::Found => "pet_reports",
        }
    }

    /// Top-level object store namespace for this kind's images
    pub fn category(&self) -> &'static str {
        match self {
            ReportKind::Search => "lost-pets",
            ReportKind::Found => "found-pets",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "lost" | "search" => Some(ReportKind::Search),
            "found" | "report" => Some(ReportKind::Found),
            _ => None,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report status
///
/// An open set: intake writes the well-known values below, the mutation
/// endpoint persists whatever the caller sends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportStatus(String);

impl ReportStatus {
    pub const PROCESSING: &'static str = "processing";
    pub const COMPLETED: &'static str = "completed";
    pub const ACTIVE: &'static str = "active";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn processing() -> Self {
        Self::new(Self::PROCESSING)
    }

    pub fn completed() -> Self {
        Self::new(Self::COMPLETED)
    }

    pub fn active() -> Self {
        Self::new(Self::ACTIVE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geographic position of a sighting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Contact details of the person who found the pet (found kind only)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinderContact {
    pub finder_name: Option<String>,
    pub finder_phone: Option<String>,
    pub finder_email: Option<String>,
}

/// One lost-search or found-report record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetReport {
    pub id: ReportId,
    pub report_type: ReportKind,
    pub image_url: String,
    pub storage_key: String,
    pub pet_type: String,
    pub breeds: Vec<String>,
    pub colors: Vec<String>,
    pub distinctive_features: Vec<String>,
    pub size: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub location: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub description: Option<String>,
    /// Date the pet was lost or found
    pub pet_date: NaiveDate,
    #[serde(flatten)]
    pub contact: FinderContact,
    pub status: ReportStatus,
    pub reward: Option<f64>,
    pub reward_claim: Option<f64>,
    pub reward_paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied by the mutation endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportPatch {
    pub status: Option<ReportStatus>,
    pub reward_paid: Option<bool>,
}

impl ReportPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.reward_paid.is_none()
    }

    pub fn status(status: ReportStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

/// Browse/search filter for report listings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    pub pet_type: Option<String>,
    pub status: Option<String>,
    /// Case-insensitive substring match on the free-text location
    pub location: Option<String>,
    pub limit: Option<i64>,
}

impl ReportFilter {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 200;

    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(ReportKind::Search.table(), "pet_searches");
        assert_eq!(ReportKind::Found.table(), "pet_reports");
        assert_eq!(ReportKind::Search.category(), "lost-pets");
        assert_eq!(ReportKind::Found.category(), "found-pets");
        assert_eq!(ReportKind::parse("Found"), Some(ReportKind::Found));
        assert_eq!(ReportKind::parse("search"), Some(ReportKind::Search));
        assert_eq!(ReportKind::parse("adopted"), None);
    }

    #[test]
    fn test_kind_serde() {
        assert_eq!(serde_json::to_value(ReportKind::Found).unwrap(), "found");
        let kind: ReportKind = serde_json::from_value(serde_json::json!("search")).unwrap();
        assert_eq!(kind, ReportKind::Search);
    }

    #[test]
    fn test_status_is_open_string() {
        let status: ReportStatus = serde_json::from_value(serde_json::json!("reunited")).unwrap();
        assert_eq!(status.as_str(), "reunited");
        assert_eq!(serde_json::to_value(ReportStatus::active()).unwrap(), "active");
    }

    #[test]
    fn test_patch_emptiness() {
        assert!(ReportPatch::default().is_empty());
        assert!(!ReportPatch::status(ReportStatus::new("claimed")).is_empty());
    }

    #[test]
    fn test_filter_limit_clamped() {
        let mut filter = ReportFilter::default();
        assert_eq!(filter.effective_limit(), 50);
        filter.limit = Some(10_000);
        assert_eq!(filter.effective_limit(), 200);
        filter.limit = Some(0);
        assert_eq!(filter.effective_limit(), 1);
    }

    #[test]
    fn test_coordinates_range() {
        assert!(Coordinates { lat: 51.5, lng: -0.12 }.is_valid());
        assert!(!Coordinates { lat: 91.0, lng: 0.0 }.is_valid());
    }
}
