//! Integration tests for PATCH /api/pets.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, dog_form, get, post_multipart, send_json, spawn_app, TestApp};
use serde_json::json;

async fn submit_found(app: &TestApp) -> String {
    let response = post_multipart(&app.router, "/api/reports", dog_form().finish()).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["reportId"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn claim_is_idempotent() {
    let app = spawn_app().await;
    let id = submit_found(&app).await;

    let first = send_json(
        &app.router,
        Method::PATCH,
        "/api/pets",
        json!({ "petId": id, "status": "claimed" }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_json(first).await;
    assert_eq!(first["success"], true);
    assert_eq!(first["pet"]["status"], "claimed");

    let second = send_json(
        &app.router,
        Method::PATCH,
        "/api/pets",
        json!({ "petId": id, "status": "claimed" }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);
    let second = body_json(second).await;

    assert_eq!(first["pet"], second["pet"]);
}

#[tokio::test]
async fn reward_paid_leaves_status_alone() {
    let app = spawn_app().await;
    let id = submit_found(&app).await;

    let response = send_json(
        &app.router,
        Method::PATCH,
        "/api/pets",
        json!({ "petId": id, "reward_paid": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let report = body_json(get(&app.router, &format!("/api/reports/{id}")).await).await;
    assert_eq!(report["reward_paid"], true);
    assert_eq!(report["status"], "active");
}

#[tokio::test]
async fn arbitrary_status_is_stored_verbatim() {
    let app = spawn_app().await;
    let id = submit_found(&app).await;

    let response = send_json(
        &app.router,
        Method::PATCH,
        "/api/pets",
        json!({ "petId": id, "status": "reunited" }),
    )
    .await;
    assert_eq!(body_json(response).await["pet"]["status"], "reunited");
}

#[tokio::test]
async fn lost_search_can_be_patched_with_kind() {
    let app = spawn_app().await;
    let response = post_multipart(&app.router, "/api/searches", dog_form().finish()).await;
    let id = body_json(response).await["searchId"].as_str().unwrap().to_string();

    let response = send_json(
        &app.router,
        Method::PATCH,
        "/api/pets",
        json!({ "petId": id, "kind": "lost", "status": "found-by-owner" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["pet"]["report_type"], "lost");
}

#[tokio::test]
async fn unknown_pet_is_not_found() {
    let app = spawn_app().await;

    let response = send_json(
        &app.router,
        Method::PATCH,
        "/api/pets",
        json!({ "petId": "6f1c1e2a-9a57-4d7c-8a50-0f3f0a9d1b2c", "status": "claimed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn bad_requests_are_rejected() {
    let app = spawn_app().await;

    let no_id = send_json(
        &app.router,
        Method::PATCH,
        "/api/pets",
        json!({ "status": "claimed" }),
    )
    .await;
    assert_eq!(no_id.status(), StatusCode::BAD_REQUEST);

    let no_fields = send_json(
        &app.router,
        Method::PATCH,
        "/api/pets",
        json!({ "petId": "6f1c1e2a-9a57-4d7c-8a50-0f3f0a9d1b2c" }),
    )
    .await;
    assert_eq!(no_fields.status(), StatusCode::BAD_REQUEST);

    let not_json = send_json(&app.router, Method::PATCH, "/api/pets", json!("claimed")).await;
    assert_eq!(not_json.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(not_json).await["error"].is_string());
}
