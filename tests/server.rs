mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use timetable_solver::config::AppConfig;
use timetable_solver::server::router;

async fn post_solve(body: Value) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/timetable/solve")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router(&AppConfig::default()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn test_feasible_request_returns_sessions() {
    let mut body = serde_json::to_value(common::department_input()).unwrap();
    body["timeLimitSecs"] = json!(30.0);
    let (status, bytes) = post_solve(body).await;
    assert_eq!(status, StatusCode::OK);

    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["status"], "feasible");
    let sessions = value["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 6);
    assert_eq!(sessions[0]["timeslot"], 0);
    assert!(sessions.iter().all(|s| s["room"].is_string() && s["enrollment"].is_u64()));
}

#[tokio::test]
async fn test_infeasible_request_is_not_an_error() {
    let (status, bytes) = post_solve(json!({
        "courses": ["A", "B"],
        "rooms": [{"id": "R1", "capacity": 30}],
        "totalTimeslots": 1
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value, json!({"status": "infeasible"}));
}

#[tokio::test]
async fn test_invalid_input_is_rejected() {
    let (status, bytes) = post_solve(json!({
        "courses": ["A"],
        "rooms": [{"id": "R1", "capacity": 0}],
        "totalTimeslots": 2
    }))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(String::from_utf8(bytes).unwrap().contains("non-positive capacity"));
}

#[tokio::test]
async fn test_negative_time_limit_is_rejected() {
    let (status, bytes) = post_solve(json!({
        "courses": ["A"],
        "rooms": [{"id": "R1", "capacity": 10}],
        "totalTimeslots": 2,
        "timeLimitSecs": -1.0
    }))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(String::from_utf8(bytes).unwrap().contains("timeLimitSecs"));
}

#[tokio::test]
async fn test_courses_without_rooms_report_infeasible() {
    let (status, bytes) = post_solve(json!({
        "courses": ["A"],
        "rooms": [],
        "totalTimeslots": 2
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value, json!({"status": "infeasible"}));
}
