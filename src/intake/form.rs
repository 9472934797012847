/// Intake form parsing
///
/// Text parts are lenient: JSON-encoded optional fields that fail to parse
/// fall back to their empty value instead of rejecting the submission.
use crate::{
    error::{PetError, PetResult},
    reports::{Coordinates, FinderContact},
};
use axum::extract::Multipart;
use chrono::{DateTime, NaiveDate};
use serde::de::DeserializeOwned;

/// The uploaded image part
#[derive(Debug, Clone, Default)]
pub struct ImagePart {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// A decoded intake submission
#[derive(Debug, Clone, Default)]
pub struct IntakeForm {
    pub image: Option<ImagePart>,
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
    pub date: Option<NaiveDate>,
    pub contact: FinderContact,
    pub reward: Option<f64>,
    pub reward_claim: Option<f64>,
}

/// Parse a JSON-encoded field, or fall back to `T::default()` when the
/// field is absent, blank, or malformed.
pub fn parse_or_default<T>(raw: Option<&str>) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return T::default();
    };

    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring malformed JSON form field");
            T::default()
        }
    }
}

/// Trimmed, de-duplicated, non-empty tags in submission order
fn clean_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp
fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

fn parse_amount(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

impl IntakeForm {
    /// Apply one named text part
    pub fn apply_text(&mut self, name: &str, value: &str) {
        match name {
            "petType" => self.pet_type = value.trim().to_string(),
            "breeds" => self.breeds = clean_tags(parse_or_default(Some(value))),
            "colors" => self.colors = clean_tags(parse_or_default(Some(value))),
            "distinctiveFeatures" => {
                self.distinctive_features = clean_tags(parse_or_default(Some(value)))
            }
            "size" => self.size = optional_text(value),
            "age" => self.age = optional_text(value),
            "gender" => self.gender = optional_text(value),
            "location" => self.location = optional_text(value),
            "coordinates" => {
                self.coordinates = parse_or_default::<Option<Coordinates>>(Some(value))
                    .filter(Coordinates::is_valid)
            }
            "description" => self.description = optional_text(value),
            "date" | "foundDate" | "lastSeenDate" => {
                if let Some(date) = parse_date(value) {
                    self.date = Some(date);
                }
            }
            "finderName" => self.contact.finder_name = optional_text(value),
            "finderPhone" => self.contact.finder_phone = optional_text(value),
            "finderEmail" => self.contact.finder_email = optional_text(value),
            "reward" => self.reward = parse_amount(value),
            "rewardClaim" => self.reward_claim = parse_amount(value),
            other => tracing::trace!(field = other, "ignoring unknown form field"),
        }
    }

    /// Read a multipart body into a form.
    ///
    /// Only a broken multipart stream is an error; an absent image is
    /// reported later so that no field is silently dropped first.
    pub async fn from_multipart(mut multipart: Multipart) -> PetResult<Self> {
        let mut form = IntakeForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| PetError::Validation(format!("Malformed multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == "image" {
                let file_name = field.file_name().map(String::from);
                let content_type = field.content_type().map(String::from);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| PetError::Validation(format!("Failed to read image: {}", e)))?
                    .to_vec();

                form.image = Some(ImagePart {
                    file_name,
                    content_type,
                    data,
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| PetError::Validation(format!("Failed to read {}: {}", name, e)))?;
                form.apply_text(&name, &value);
            }
        }

        Ok(form)
    }
}
