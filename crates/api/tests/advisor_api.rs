//! Failure prediction and client log intake. Neither touches the database.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, post_json, post_json_auth, token_for, StubPredictor};
use planpm_api::advisor::FailurePredictor;
use planpm_core::advisor::PredictionResponse;

fn request_body() -> serde_json::Value {
    serde_json::json!({
        "instrument_name": "HPLC-01",
        "maintenance_history": "Pump seals replaced in June, detector lamp at 1800 hours",
        "usage_patterns": "Two shifts a day, high-salt buffers"
    })
}

fn stub(reply: Result<PredictionResponse, u16>) -> Option<Arc<dyn FailurePredictor>> {
    Some(Arc::new(StubPredictor { reply }))
}

#[tokio::test]
async fn prediction_is_returned_in_data_envelope() {
    let predictor = stub(Ok(PredictionResponse {
        failure_likelihood: "High".into(),
        recommended_actions: "Replace the detector lamp".into(),
    }));
    let app = common::build_test_app(common::unreachable_pool(), predictor);

    let response =
        post_json_auth(app, "/api/v1/advisor/predict", request_body(), &token_for(3, "user")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["failure_likelihood"], "High");
    assert_eq!(json["data"]["recommended_actions"], "Replace the detector lamp");
}

#[tokio::test]
async fn unconfigured_advisor_returns_503() {
    let app = common::build_test_app(common::unreachable_pool(), None);
    let response =
        post_json_auth(app, "/api/v1/advisor/predict", request_body(), &token_for(3, "user")).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn blank_fields_are_rejected_before_calling_the_model() {
    let app = common::build_test_app(common::unreachable_pool(), stub(Err(500)));
    let mut body = request_body();
    body["usage_patterns"] = serde_json::json!("  ");

    let response = post_json_auth(app, "/api/v1/advisor/predict", body, &token_for(3, "user")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("usage_patterns"));
}

#[tokio::test]
async fn upstream_failure_returns_502() {
    let app = common::build_test_app(common::unreachable_pool(), stub(Err(529)));
    let response =
        post_json_auth(app, "/api/v1/advisor/predict", request_body(), &token_for(3, "user")).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn prediction_requires_authentication() {
    let app = common::build_test_app(common::unreachable_pool(), None);
    let response = post_json(app, "/api/v1/advisor/predict", request_body()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn client_logs_are_accepted_without_auth() {
    let app = common::build_test_app(common::unreachable_pool(), None);
    let body = serde_json::json!({
        "level": "error",
        "message": "Calendar failed to render",
        "context": { "route": "/dashboard" }
    });
    let response = post_json(app, "/api/v1/logs/client", body).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn client_log_with_unknown_level_is_rejected() {
    let app = common::build_test_app(common::unreachable_pool(), None);
    let body = serde_json::json!({ "level": "fatal", "message": "x" });
    let response = post_json(app, "/api/v1/logs/client", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
