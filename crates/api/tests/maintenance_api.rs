//! Instruments, configurations, schedules, results and the dashboard.

mod common;

use axum::http::StatusCode;
use common::{body_bytes, body_json, get_auth, post_json_auth, put_json_auth, token_for};
use planpm_api::auth::password::hash_password;
use planpm_core::access::Permissions;
use planpm_db::models::user::{CreateUser, User};
use planpm_db::repositories::UserRepo;
use sqlx::PgPool;

async fn create_user(pool: &PgPool, username: &str, role_id: i64) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        display_name: None,
        password_hash: hash_password("Calibr8!on").unwrap(),
        role_id,
        permissions: serde_json::to_value(Permissions::default()).unwrap(),
        is_super_admin: false,
    };
    UserRepo::create(pool, &input).await.unwrap()
}

/// POST and return the `data` payload, asserting 201.
async fn create(pool: &PgPool, uri: &str, body: serde_json::Value, token: &str) -> serde_json::Value {
    let app = common::build_test_app(pool.clone(), None);
    let response = post_json_auth(app, uri, body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED, "POST {uri}");
    body_json(response).await["data"].clone()
}

async fn fetch(pool: &PgPool, uri: &str, token: &str) -> serde_json::Value {
    let app = common::build_test_app(pool.clone(), None);
    let response = get_auth(app, uri, token).await;
    assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Validation that stops before the database
// ---------------------------------------------------------------------------

#[tokio::test]
async fn summary_rejects_unsupported_window() {
    let app = common::build_test_app(common::unreachable_pool(), None);
    let response =
        get_auth(app, "/api/v1/dashboard/summary?window=45", &token_for(1, "admin")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Use 30 or 90"));
}

#[tokio::test]
async fn configuration_with_unknown_frequency_is_rejected() {
    let app = common::build_test_app(common::unreachable_pool(), None);
    let body = serde_json::json!({
        "instrument_id": 1,
        "maintenance_type": "AMC",
        "frequency": "Fortnightly",
        "schedule_date": "2025-01-15"
    });
    let response =
        post_json_auth(app, "/api/v1/configurations", body, &token_for(1, "admin")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn schedule_status_must_be_known() {
    let app = common::build_test_app(common::unreachable_pool(), None);
    let body = serde_json::json!({ "status": "Done" });
    let response =
        put_json_auth(app, "/api/v1/schedules/5/status", body, &token_for(1, "admin")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Full flow (database)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn configuration_projects_monthly_occurrences(pool: PgPool) {
    let admin = create_user(&pool, "planner", 1).await;
    let token = token_for(admin.id, "admin");

    let instrument = create(
        &pool,
        "/api/v1/instruments",
        serde_json::json!({
            "eqp_id": "EQP-100",
            "instrument_type": "HPLC",
            "location": "Lab 2"
        }),
        &token,
    )
    .await;

    create(
        &pool,
        "/api/v1/configurations",
        serde_json::json!({
            "instrument_id": instrument["id"],
            "maintenance_type": "Preventive Maintenance",
            "frequency": "Monthly",
            "schedule_date": "2024-01-31"
        }),
        &token,
    )
    .await;

    let projection = fetch(&pool, "/api/v1/dashboard/projection", &token).await;
    let events = projection["events"].as_array().unwrap();
    assert_eq!(events.len(), 12);
    assert!(events.iter().all(|e| e["instrument_name"] == "EQP-100"));
    assert!(events.iter().all(|e| e["status"] == "Scheduled"));
    assert_eq!(projection["by_type"][0]["maintenance_type"], "Preventive Maintenance");
    assert_eq!(projection["by_type"][0]["count"], 12);
    assert!(projection["issues"].as_array().unwrap().is_empty());

    // Another user's projection does not include these configurations.
    let other = create_user(&pool, "observer", 1).await;
    let projection = fetch(&pool, "/api/v1/dashboard/projection", &token_for(other.id, "admin")).await;
    assert!(projection["events"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn recording_a_result_completes_the_schedule(pool: PgPool) {
    let admin = create_user(&pool, "engineer", 1).await;
    let token = token_for(admin.id, "admin");

    let instrument = create(
        &pool,
        "/api/v1/instruments",
        serde_json::json!({
            "eqp_id": "EQP-200",
            "instrument_type": "Centrifuge",
            "location": "Lab 1"
        }),
        &token,
    )
    .await;

    let due = (chrono::Utc::now() - chrono::Duration::days(2)).to_rfc3339();
    let schedule = create(
        &pool,
        "/api/v1/schedules",
        serde_json::json!({
            "instrument_id": instrument["id"],
            "maintenance_type": "AMC",
            "due_date": due
        }),
        &token,
    )
    .await;
    assert_eq!(schedule["status"], "Scheduled");

    let summary = fetch(&pool, "/api/v1/dashboard/summary", &token).await;
    assert_eq!(summary["overdue"]["total"], 1);
    assert_eq!(summary["overdue"]["items"][0]["due_chip"], "2d overdue");

    create(
        &pool,
        "/api/v1/results",
        serde_json::json!({
            "schedule_id": schedule["id"],
            "result_type": "Annual service",
            "test_data": [{
                "title": "Rotor",
                "rows": [
                    { "label": "Speed", "passed": true },
                    { "label": "Imbalance", "passed": false }
                ]
            }]
        }),
        &token,
    )
    .await;

    let schedule_uri = format!("/api/v1/schedules/{}", schedule["id"]);
    let stored = fetch(&pool, &schedule_uri, &token).await;
    assert_eq!(stored["status"], "Completed");
    assert!(stored["completed_date"].is_string());

    let results = fetch(&pool, "/api/v1/results?search=eqp-200", &token).await;
    assert_eq!(results.as_array().unwrap().len(), 1);
    assert_eq!(results[0]["overall_status"]["outcome"], "fail");
    assert_eq!(results[0]["maintenance_type"], "AMC");

    let summary = fetch(&pool, "/api/v1/dashboard/summary?window=90", &token).await;
    assert_eq!(summary["window_days"], 90);
    assert_eq!(summary["overdue"]["total"], 0);
    assert_eq!(summary["completed"]["total"], 1);

    let app = common::build_test_app(pool.clone(), None);
    let response = get_auth(app, "/api/v1/dashboard/summary/export", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("<h3>Recently Completed</h3><ul><li><strong>EQP-200</strong>"));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn module_permissions_gate_writes(pool: PgPool) {
    let user = create_user(&pool, "viewer", 2).await;
    let token = token_for(user.id, "user");

    // Default permissions: dashboard view only, instruments hidden.
    let app = common::build_test_app(pool.clone(), None);
    let response = get_auth(app, "/api/v1/instruments", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone(), None);
    let response = get_auth(app, "/api/v1/dashboard/overview", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn custom_maintenance_types_merge_with_defaults(pool: PgPool) {
    let admin = create_user(&pool, "settings", 1).await;
    let token = token_for(admin.id, "admin");

    create(
        &pool,
        "/api/v1/maintenance-types",
        serde_json::json!({ "name": "Calibration" }),
        &token,
    )
    .await;

    let app = common::build_test_app(pool.clone(), None);
    let response = post_json_auth(
        app,
        "/api/v1/maintenance-types",
        serde_json::json!({ "name": "amc" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let types = fetch(&pool, "/api/v1/maintenance-types", &token).await;
    let names: Vec<&str> = types["names"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n.as_str().unwrap())
        .collect();
    assert_eq!(names.first(), Some(&"General"));
    assert_eq!(names.last(), Some(&"Calibration"));
    assert_eq!(types["custom"].as_array().unwrap().len(), 1);
}
