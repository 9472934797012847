/// Report Store
///
/// Flat keyed tables, one per report kind, addressed by report id.
use crate::{
    error::{PetError, PetResult},
    ids::ReportId,
    reports::{
        Coordinates, FinderContact, PetReport, ReportFilter, ReportKind, ReportPatch,
        ReportStatus,
    },
};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};

const REPORT_COLUMNS: &str = r#"
    id, report_type, image_url, storage_key, pet_type, breeds, colors,
    distinctive_features, size, age, gender, location, latitude, longitude,
    description, pet_date, finder_name, finder_phone, finder_email, status,
    reward, reward_claim, reward_paid, created_at, updated_at
"#;

/// Report store
#[derive(Clone)]
pub struct ReportStore {
    db: SqlitePool,
}

impl ReportStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert a new report. Exactly one row is created.
    pub async fn insert(&self, report: &PetReport) -> PetResult<()> {
        Self::validate_new(report)?;

        let sql = format!(
            r#"
            INSERT INTO {} ({})
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            report.report_type.table(),
            REPORT_COLUMNS
        );

        let result = sqlx::query(&sql)
            .bind(report.id.to_string())
            .bind(report.report_type.as_str())
            .bind(&report.image_url)
            .bind(&report.storage_key)
            .bind(&report.pet_type)
            .bind(encode_list(&report.breeds)?)
            .bind(encode_list(&report.colors)?)
            .bind(encode_list(&report.distinctive_features)?)
            .bind(&report.size)
            .bind(&report.age)
            .bind(&report.gender)
            .bind(&report.location)
            .bind(report.coordinates.map(|c| c.lat))
            .bind(report.coordinates.map(|c| c.lng))
            .bind(&report.description)
            .bind(report.pet_date.format("%Y-%m-%d").to_string())
            .bind(&report.contact.finder_name)
            .bind(&report.contact.finder_phone)
            .bind(&report.contact.finder_email)
            .bind(report.status.as_str())
            .bind(report.reward)
            .bind(report.reward_claim)
            .bind(report.reward_paid)
            .bind(report.created_at.to_rfc3339())
            .bind(report.updated_at.to_rfc3339())
            .execute(&self.db)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(PetError::Conflict(
                format!("Report {} already exists", report.id),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply a partial update and return the resulting record
    pub async fn update_by_id(
        &self,
        kind: ReportKind,
        id: &ReportId,
        patch: &ReportPatch,
    ) -> PetResult<PetReport> {
        if patch.is_empty() {
            return Err(PetError::Validation("No fields to update".to_string()));
        }

        // updated_at only moves when a value changes, so repeating a patch is a no-op
        let sql = format!(
            r#"
            UPDATE {}
            SET updated_at = CASE
                    WHEN COALESCE(?1, status) IS NOT status
                      OR COALESCE(?2, reward_paid) IS NOT reward_paid
                    THEN ?3
                    ELSE updated_at
                END,
                status = COALESCE(?1, status),
                reward_paid = COALESCE(?2, reward_paid)
            WHERE id = ?4
            "#,
            kind.table()
        );

        let result = sqlx::query(&sql)
            .bind(patch.status.as_ref().map(|s| s.as_str().to_string()))
            .bind(patch.reward_paid)
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PetError::NotFound(format!("Report {} not found", id)));
        }

        self.get_by_id(kind, id)
            .await?
            .ok_or_else(|| PetError::NotFound(format!("Report {} not found", id)))
    }

    /// Get report by ID
    pub async fn get_by_id(&self, kind: ReportKind, id: &ReportId) -> PetResult<Option<PetReport>> {
        let sql = format!("SELECT {} FROM {} WHERE id = ?", REPORT_COLUMNS, kind.table());

        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.db)
            .await?;

        row.map(parse_report).transpose()
    }

    /// List reports, newest first
    pub async fn list(&self, kind: ReportKind, filter: &ReportFilter) -> PetResult<Vec<PetReport>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM {} WHERE 1 = 1",
            REPORT_COLUMNS,
            kind.table()
        ));

        if let Some(pet_type) = filter.pet_type.as_deref().filter(|s| !s.trim().is_empty()) {
            query
                .push(" AND lower(pet_type) = lower(")
                .push_bind(pet_type.trim().to_string())
                .push(")");
        }
        if let Some(status) = filter.status.as_deref().filter(|s| !s.trim().is_empty()) {
            query.push(" AND status = ").push_bind(status.trim().to_string());
        }
        if let Some(location) = filter.location.as_deref().filter(|s| !s.trim().is_empty()) {
            query
                .push(" AND lower(location) LIKE ")
                .push_bind(format!("%{}%", location.trim().to_lowercase()));
        }

        query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(filter.effective_limit());

        let rows = query.build().fetch_all(&self.db).await?;

        rows.into_iter().map(parse_report).collect()
    }

    /// Whether any report of either kind references this object path
    pub async fn storage_key_in_use(&self, storage_key: &str) -> PetResult<bool> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS(SELECT 1 FROM pet_searches WHERE storage_key = ?1)
                OR EXISTS(SELECT 1 FROM pet_reports WHERE storage_key = ?1) AS in_use
            "#,
        )
        .bind(storage_key)
        .fetch_one(&self.db)
        .await?;

        Ok(row.get::<bool, _>("in_use"))
    }

    fn validate_new(report: &PetReport) -> PetResult<()> {
        if report.pet_type.trim().is_empty() {
            return Err(PetError::Validation("petType is required".to_string()));
        }
        if report.colors.is_empty() {
            return Err(PetError::Validation(
                "At least one color is required".to_string(),
            ));
        }
        if report.image_url.is_empty() || report.storage_key.is_empty() {
            return Err(PetError::Validation(
                "Report must reference a stored image".to_string(),
            ));
        }
        Ok(())
    }
}

fn encode_list(values: &[String]) -> PetResult<String> {
    serde_json::to_string(values)
        .map_err(|e| PetError::RecordStore(format!("Failed to encode list: {}", e)))
}

fn decode_list(raw: &str) -> PetResult<Vec<String>> {
    serde_json::from_str(raw)
        .map_err(|e| PetError::RecordStore(format!("Invalid list column: {}", e)))
}

fn parse_timestamp(raw: &str) -> PetResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PetError::RecordStore(format!("Invalid timestamp: {}", e)))
}

fn parse_report(row: SqliteRow) -> PetResult<PetReport> {
    let id_str: String = row.try_get("id")?;
    let id = id_str
        .parse::<ReportId>()
        .map_err(|_| PetError::RecordStore(format!("Invalid report id in row: {}", id_str)))?;

    let report_type_str: String = row.try_get("report_type")?;
    let report_type = ReportKind::parse(&report_type_str).ok_or_else(|| {
        PetError::RecordStore(format!("Invalid report type: {}", report_type_str))
    })?;

    let latitude: Option<f64> = row.try_get("latitude")?;
    let longitude: Option<f64> = row.try_get("longitude")?;
    let coordinates = match (latitude, longitude) {
        (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
        _ => None,
    };

    let pet_date_str: String = row.try_get("pet_date")?;
    let pet_date = NaiveDate::parse_from_str(&pet_date_str, "%Y-%m-%d")
        .map_err(|e| PetError::RecordStore(format!("Invalid pet date: {}", e)))?;

    let status: String = row.try_get("status")?;
    let breeds: String = row.try_get("breeds")?;
    let colors: String = row.try_get("colors")?;
    let features: String = row.try_get("distinctive_features")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(PetReport {
        id,
        report_type,
        image_url: row.try_get("image_url")?,
        storage_key: row.try_get("storage_key")?,
        pet_type: row.try_get("pet_type")?,
        breeds: decode_list(&breeds)?,
        colors: decode_list(&colors)?,
        distinctive_features: decode_list(&features)?,
        size: row.try_get("size")?,
        age: row.try_get("age")?,
        gender: row.try_get("gender")?,
        location: row.try_get("location")?,
        coordinates,
        description: row.try_get("description")?,
        pet_date,
        contact: FinderContact {
            finder_name: row.try_get("finder_name")?,
            finder_phone: row.try_get("finder_phone")?,
            finder_email: row.try_get("finder_email")?,
        },
        status: ReportStatus::new(status),
        reward: row.try_get("reward")?,
        reward_claim: row.try_get("reward_claim")?,
        reward_paid: row.try_get("reward_paid")?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db;

    pub(crate) fn sample_report(kind: ReportKind) -> PetReport {
        let id = ReportId::generate();
        let now = Utc::now();
        let storage_key = format!("{}/{}/1700000000000.jpg", kind.category(), id);
        PetReport {
            id,
            report_type: kind,
            image_url: format!("http://localhost:8080/objects/{}", storage_key),
            storage_key,
            pet_type: "dog".to_string(),
            breeds: vec!["beagle".to_string()],
            colors: vec!["brown".to_string(), "white".to_string()],
            distinctive_features: vec![],
            size: Some("medium".to_string()),
            age: None,
            gender: None,
            location: Some("Riverside Park".to_string()),
            coordinates: Some(Coordinates { lat: 40.8, lng: -73.97 }),
            description: None,
            pet_date: now.date_naive(),
            contact: FinderContact::default(),
            status: ReportStatus::active(),
            reward: None,
            reward_claim: None,
            reward_paid: false,
            created_at: now,
            updated_at: now,
        }
    }

    async fn create_test_store() -> ReportStore {
        ReportStore::new(db::memory_pool().await.unwrap())
    }

    #[tokio::test]
    async fn test_insert_and_get_report() {
        let store = create_test_store().await;
        let report = sample_report(ReportKind::Found);

        store.insert(&report).await.unwrap();

        let fetched = store
            .get_by_id(ReportKind::Found, &report.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.id, report.id);
        assert_eq!(fetched.colors, report.colors);
        assert_eq!(fetched.coordinates, report.coordinates);
        assert_eq!(fetched.pet_date, report.pet_date);
        assert_eq!(fetched.status, ReportStatus::active());

        // Kinds are separate collections
        assert!(store
            .get_by_id(ReportKind::Search, &report.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_conflicts() {
        let store = create_test_store().await;
        let report = sample_report(ReportKind::Search);

        store.insert(&report).await.unwrap();
        let result = store.insert(&report).await;
        assert!(matches!(result, Err(PetError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_insert_requires_pet_type_and_color() {
        let store = create_test_store().await;

        let mut report = sample_report(ReportKind::Found);
        report.pet_type = "  ".to_string();
        assert!(matches!(store.insert(&report).await, Err(PetError::Validation(_))));

        let mut report = sample_report(ReportKind::Found);
        report.colors.clear();
        assert!(matches!(store.insert(&report).await, Err(PetError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_by_id_merges() {
        let store = create_test_store().await;
        let report = sample_report(ReportKind::Found);
        store.insert(&report).await.unwrap();

        let updated = store
            .update_by_id(
                ReportKind::Found,
                &report.id,
                &ReportPatch {
                    status: None,
                    reward_paid: Some(true),
                },
            )
            .await
            .unwrap();
        assert!(updated.reward_paid);
        assert_eq!(updated.status, ReportStatus::active());

        let updated = store
            .update_by_id(
                ReportKind::Found,
                &report.id,
                &ReportPatch::status(ReportStatus::new("claimed")),
            )
            .await
            .unwrap();
        assert_eq!(updated.status.as_str(), "claimed");
        assert!(updated.reward_paid);
        assert_eq!(updated.image_url, report.image_url);
    }

    #[tokio::test]
    async fn test_repeated_patch_leaves_record_unchanged() {
        let store = create_test_store().await;
        let report = sample_report(ReportKind::Found);
        store.insert(&report).await.unwrap();

        // Setting the current status again touches nothing
        let unchanged = ReportPatch::status(ReportStatus::active());
        let same = store
            .update_by_id(ReportKind::Found, &report.id, &unchanged)
            .await
            .unwrap();
        assert_eq!(same.updated_at, report.updated_at);

        let claim = ReportPatch {
            status: Some(ReportStatus::new("claimed")),
            reward_paid: Some(true),
        };
        let first = store
            .update_by_id(ReportKind::Found, &report.id, &claim)
            .await
            .unwrap();
        let second = store
            .update_by_id(ReportKind::Found, &report.id, &claim)
            .await
            .unwrap();

        assert!(first.updated_at >= report.updated_at);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_update_missing_and_empty() {
        let store = create_test_store().await;

        let missing = store
            .update_by_id(
                ReportKind::Found,
                &ReportId::generate(),
                &ReportPatch::status(ReportStatus::completed()),
            )
            .await;
        assert!(matches!(missing, Err(PetError::NotFound(_))));

        let report = sample_report(ReportKind::Found);
        store.insert(&report).await.unwrap();
        let empty = store
            .update_by_id(ReportKind::Found, &report.id, &ReportPatch::default())
            .await;
        assert!(matches!(empty, Err(PetError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_with_filters() {
        let store = create_test_store().await;

        let dog = sample_report(ReportKind::Found);
        let mut cat = sample_report(ReportKind::Found);
        cat.pet_type = "cat".to_string();
        cat.location = Some("Downtown".to_string());
        store.insert(&dog).await.unwrap();
        store.insert(&cat).await.unwrap();

        let all = store.list(ReportKind::Found, &ReportFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let cats = store
            .list(
                ReportKind::Found,
                &ReportFilter {
                    pet_type: Some("Cat".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].id, cat.id);

        let riverside = store
            .list(
                ReportKind::Found,
                &ReportFilter {
                    location: Some("riverside".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(riverside.len(), 1);
        assert_eq!(riverside[0].id, dog.id);

        let none = store.list(ReportKind::Search, &ReportFilter::default()).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_storage_key_in_use() {
        let store = create_test_store().await;
        let report = sample_report(ReportKind::Search);
        store.insert(&report).await.unwrap();

        assert!(store.storage_key_in_use(&report.storage_key).await.unwrap());
        assert!(!store.storage_key_in_use("lost-pets/other/1.jpg").await.unwrap());
    }
}
