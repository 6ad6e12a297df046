//! Router tests over an in-memory store.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use fluxo_db::MemoryStore;
use fluxo_shared::AppConfig;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{AppState, create_router};

fn config() -> AppConfig {
    serde_json::from_value(json!({
        "store": { "url": "http://store.invalid", "api_key": "k" },
        "auth": { "shared_secret": "open-sesame" },
        "views": { "dashboard": { "exclude": ["reembolso"] } }
    }))
    .unwrap()
}

fn store() -> MemoryStore {
    MemoryStore::new()
        .with_table(
            "movements",
            vec![
                json!({"id": 1, "payment_date": "2024-03-05", "is_paid": true, "net_amount": 150,
                       "payment_type": "NFE", "title": "Cimento", "project_id": 10}),
                json!({"id": 2, "due_date": "2024-03-20", "is_paid": false, "net_amount": 50,
                       "payment_type": "NFS", "title": "Consultoria"}),
                json!({"id": 3, "payment_date": "2024-03-07", "is_paid": true, "net_amount": 9,
                       "description": "Reembolso km"}),
                json!({"id": 4, "due_date": "2024-04-02", "is_paid": false, "net_amount": 70}),
            ],
        )
        .with_table("invoices", vec![])
        .with_table("invoice_items", vec![])
        .with_table("projects", vec![json!({"id": 10, "name": "Obra Centro"})])
        .with_table("categories", vec![])
        .with_table(
            "receipts",
            vec![
                json!({"id": 7, "due_date": "2024-03-10", "value": 100, "status": "PENDING"}),
                json!({"id": 8, "due_date": "2024-03-02", "value": 40, "status": "RECEIVED"}),
            ],
        )
}

fn state() -> AppState {
    AppState::new(config(), Arc::new(store()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, cookie, body)
}

fn get(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, cookie: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn login(state: &AppState) -> String {
    let (status, cookie, _) = send(
        create_router(state.clone()),
        json_request("POST", "/api/v1/auth/login", "", &json!({"secret": "open-sesame"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    cookie.unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let (status, _, body) = send(create_router(state()), get("/api/v1/health", "")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_protected_route_requires_session() {
    let (status, _, body) = send(
        create_router(state()),
        get("/api/v1/views/dashboard", ""),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _, _) = send(
        create_router(state()),
        get(
            "/api/v1/views/dashboard",
            "fluxo_session=6f1c6a4e-0000-4000-8000-000000000000",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_secret_rejected() {
    let state = state();
    let (status, cookie, _) = send(
        create_router(state.clone()),
        json_request("POST", "/api/v1/auth/login", "", &json!({"secret": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(cookie.is_none());
    assert!(state.sessions.is_empty());
}

#[tokio::test]
async fn test_dashboard_view() {
    let state = state();
    let cookie = login(&state).await;

    let (status, _, body) = send(
        create_router(state.clone()),
        get(
            "/api/v1/views/dashboard?start=2024-03-01&end=2024-03-31&sort=amount&dir=desc",
            &cookie,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "dashboard");
    assert_eq!(body["generation"], 1);
    let rows = body["rows"].as_array().unwrap();
    // The configured exclude keyword drops movement 3; movement 4 is in April.
    let ids: Vec<i64> = rows.iter().map(|r| r["movement_id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(rows[0]["project"], "Obra Centro");
    assert_eq!(rows[1]["project"], "N/A");
    assert_eq!(body["summary"]["row_count"], 2);
    assert_eq!(body["summary"]["total"], "200");
}

#[tokio::test]
async fn test_view_filters_do_not_change_session_rows() {
    let state = state();
    let cookie = login(&state).await;

    let (status, _, body) = send(
        create_router(state.clone()),
        get(
            "/api/v1/views/dashboard?start=2024-03-01&end=2024-03-31&status=open",
            &cookie,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"].as_array().unwrap().len(), 1);

    let (status, _, body) = send(
        create_router(state.clone()),
        get("/api/v1/views/dashboard/state", &cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["loading"], false);
    assert_eq!(body["rows"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_typed_view() {
    let state = state();
    let cookie = login(&state).await;

    let (status, _, body) = send(
        create_router(state.clone()),
        get("/api/v1/views/nfs?start=2024-03-01&end=2024-03-31", &cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Consultoria");
}

#[tokio::test]
async fn test_bad_requests() {
    let state = state();
    let cookie = login(&state).await;

    for uri in [
        "/api/v1/views/ledger?start=2024-03-01&end=2024-03-31",
        "/api/v1/views/dashboard?start=2024-03-31&end=2024-03-01",
        "/api/v1/views/dashboard?project=abc",
        "/api/v1/views/dashboard?sort=colour",
    ] {
        let (status, _, body) = send(create_router(state.clone()), get(uri, &cookie)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], "validation_error", "{uri}");
    }
}

#[tokio::test]
async fn test_projects() {
    let state = state();
    let cookie = login(&state).await;

    let (status, _, body) = send(create_router(state.clone()), get("/api/v1/projects", &cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": 10, "name": "Obra Centro"}]));
}

#[tokio::test]
async fn test_receipt_list_and_status_update() {
    let state = state();
    let cookie = login(&state).await;

    let (status, _, body) = send(
        create_router(state.clone()),
        get("/api/v1/receipts?start=2024-03-01&end=2024-03-31", &cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let receipts = body["receipts"].as_array().unwrap();
    assert_eq!(receipts[0]["id"], 8);
    assert_eq!(receipts[1]["id"], 7);
    assert_eq!(body["total"], "140");

    let (status, _, body) = send(
        create_router(state.clone()),
        json_request(
            "PATCH",
            "/api/v1/receipts/7/status",
            &cookie,
            &json!({"status": "RECEIVED"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "RECEIVED");
    assert_eq!(body["receipt"]["status"], "RECEIVED");

    let (status, _, body) = send(
        create_router(state.clone()),
        json_request("PATCH", "/api/v1/receipts/7/status", &cookie, &json!({"status": " "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_status_update_for_unknown_receipt() {
    let state = state();
    let cookie = login(&state).await;

    let (status, _, body) = send(
        create_router(state.clone()),
        json_request(
            "PATCH",
            "/api/v1/receipts/404/status",
            &cookie,
            &json!({"status": "RECEIVED"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_logout_ends_session() {
    let state = state();
    let cookie = login(&state).await;
    assert_eq!(state.sessions.len(), 1);

    let (status, _, _) = send(
        create_router(state.clone()),
        json_request("POST", "/api/v1/auth/logout", &cookie, &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(state.sessions.is_empty());

    let (status, _, _) = send(create_router(state.clone()), get("/api/v1/projects", &cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
