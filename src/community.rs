/// Community submissions: contact messages, feedback, shelter and volunteer signups
///
/// Insert-only forms. Each accepted submission gets a fresh id.
use crate::error::PetResult;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactMessage {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 200))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Feedback {
    #[validate(range(min = 1, max = 5))]
    pub rating: i64,
    #[validate(length(max = 5000))]
    pub message: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 500))]
    pub page: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignupKind {
    Shelter,
    Volunteer,
}

impl SignupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignupKind::Shelter => "shelter",
            SignupKind::Volunteer => "volunteer",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VolunteerSignup {
    pub kind: SignupKind,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub organization: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 5000))]
    pub message: Option<String>,
}

/// Created-response body
#[derive(Debug, Serialize)]
pub struct SubmissionCreated {
    pub id: Uuid,
}

#[derive(Clone)]
pub struct CommunityStore {
    db: SqlitePool,
}

impl CommunityStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn submit_contact(&self, msg: &ContactMessage) -> PetResult<Uuid> {
        msg.validate()?;
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO contact_message (id, name, email, subject, message, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(msg.name.trim())
        .bind(msg.email.trim())
        .bind(&msg.subject)
        .bind(&msg.message)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.db)
        .await?;

        tracing::info!(id = %id, "contact message received");
        Ok(id)
    }

    pub async fn submit_feedback(&self, feedback: &Feedback) -> PetResult<Uuid> {
        feedback.validate()?;
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO feedback (id, rating, message, email, page, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(feedback.rating)
        .bind(&feedback.message)
        .bind(&feedback.email)
        .bind(&feedback.page)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.db)
        .await?;

        Ok(id)
    }

    pub async fn submit_signup(&self, signup: &VolunteerSignup) -> PetResult<Uuid> {
        signup.validate()?;
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO volunteer_signup
                (id, kind, name, email, phone, organization, location, message, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(signup.kind.as_str())
        .bind(signup.name.trim())
        .bind(signup.email.trim())
        .bind(&signup.phone)
        .bind(&signup.organization)
        .bind(&signup.location)
        .bind(&signup.message)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.db)
        .await?;

        tracing::info!(id = %id, kind = signup.kind.as_str(), "signup received");
        Ok(id)
    }
}
