/// Contact, feedback and volunteer signup endpoints
use crate::{
    community::{ContactMessage, Feedback, SubmissionCreated, VolunteerSignup},
    context::AppContext,
    error::{PetError, PetResult},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};

/// Build community routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/contact", post(submit_contact))
        .route("/api/feedback", post(submit_feedback))
        .route("/api/volunteers", post(submit_signup))
}

type Created = (StatusCode, Json<SubmissionCreated>);

fn created(id: uuid::Uuid) -> Created {
    (StatusCode::CREATED, Json(SubmissionCreated { id }))
}

fn body<T>(body: Result<Json<T>, JsonRejection>) -> PetResult<T> {
    body.map(|Json(value)| value)
        .map_err(|e| PetError::Validation(e.body_text()))
}

async fn submit_contact(
    State(ctx): State<AppContext>,
    payload: Result<Json<ContactMessage>, JsonRejection>,
) -> PetResult<Created> {
    let msg = body(payload)?;
    Ok(created(ctx.community.submit_contact(&msg).await?))
}

async fn submit_feedback(
    State(ctx): State<AppContext>,
    payload: Result<Json<Feedback>, JsonRejection>,
) -> PetResult<Created> {
    let feedback = body(payload)?;
    Ok(created(ctx.community.submit_feedback(&feedback).await?))
}

async fn submit_signup(
    State(ctx): State<AppContext>,
    payload: Result<Json<VolunteerSignup>, JsonRejection>,
) -> PetResult<Created> {
    let signup = body(payload)?;
    Ok(created(ctx.community.submit_signup(&signup).await?))
}
