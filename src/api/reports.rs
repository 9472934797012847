/// Lost-search and found-report endpoints: intake, lookup, listing and mutation
use crate::{
    context::AppContext,
    error::{PetError, PetResult},
    ids::ReportId,
    intake::IntakeForm,
    mutation::MutationRequest,
    reports::{PetReport, ReportFilter, ReportKind},
};
use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, Path, Query, State,
    },
    routing::{get, patch},
    Json, Router,
};
use serde::Serialize;

/// Build report routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/searches", get(list_searches).post(create_search))
        .route("/api/searches/:id", get(get_search))
        .route("/api/reports", get(list_reports).post(create_report))
        .route("/api/reports/:id", get(get_report))
        .route("/api/pets", patch(update_pet))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCreated {
    pub search_id: ReportId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCreated {
    pub report_id: ReportId,
}

#[derive(Debug, Serialize)]
pub struct PetUpdated {
    pub success: bool,
    pub pet: PetReport,
}

/// Submit a lost-pet search (multipart)
async fn create_search(
    State(ctx): State<AppContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> PetResult<Json<SearchCreated>> {
    let form = read_form(multipart).await?;
    let search_id = ctx.intake.submit(ReportKind::Search, form).await?;

    Ok(Json(SearchCreated { search_id }))
}

/// Submit a found-pet report (multipart)
async fn create_report(
    State(ctx): State<AppContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> PetResult<Json<ReportCreated>> {
    let form = read_form(multipart).await?;
    let report_id = ctx.intake.submit(ReportKind::Found, form).await?;

    Ok(Json(ReportCreated { report_id }))
}

async fn read_form(multipart: Result<Multipart, MultipartRejection>) -> PetResult<IntakeForm> {
    let multipart = multipart.map_err(|e| PetError::Validation(e.body_text()))?;
    IntakeForm::from_multipart(multipart).await
}

async fn get_search(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> PetResult<Json<PetReport>> {
    fetch(&ctx, ReportKind::Search, &id).await.map(Json)
}

async fn get_report(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> PetResult<Json<PetReport>> {
    fetch(&ctx, ReportKind::Found, &id).await.map(Json)
}

async fn fetch(ctx: &AppContext, kind: ReportKind, raw_id: &str) -> PetResult<PetReport> {
    // A malformed id can never match a stored record
    let id: ReportId = raw_id
        .parse()
        .map_err(|_| PetError::NotFound(format!("{} {} not found", kind, raw_id)))?;

    ctx.reports
        .get_by_id(kind, &id)
        .await?
        .ok_or_else(|| PetError::NotFound(format!("{} {} not found", kind, raw_id)))
}

async fn list_searches(
    State(ctx): State<AppContext>,
    Query(filter): Query<ReportFilter>,
) -> PetResult<Json<Vec<PetReport>>> {
    Ok(Json(ctx.reports.list(ReportKind::Search, &filter).await?))
}

async fn list_reports(
    State(ctx): State<AppContext>,
    Query(filter): Query<ReportFilter>,
) -> PetResult<Json<Vec<PetReport>>> {
    Ok(Json(ctx.reports.list(ReportKind::Found, &filter).await?))
}

/// Apply a status / reward-paid change to one record
async fn update_pet(
    State(ctx): State<AppContext>,
    body: Result<Json<MutationRequest>, JsonRejection>,
) -> PetResult<Json<PetUpdated>> {
    let Json(request) = body.map_err(|e| PetError::Validation(e.body_text()))?;
    let pet = ctx.mutation.apply(request).await?;

    Ok(Json(PetUpdated { success: true, pet }))
}
