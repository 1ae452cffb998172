//! HTTP round trips through the router on the in-memory store

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use task_service::prelude::*;

fn app() -> Router {
    let state = AppState::new(Config::default(), TaskBackend::Memory(MemoryTaskStore::new()));
    create_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "task-service");
}

#[tokio::test]
async fn test_create_then_get() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({"title": "Write report", "priority": 2, "due_date": "2025-03-10"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Task created successfully");
    let id = body["task_id"].as_u64().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task"]["title"], "Write report");
    assert_eq!(body["task"]["status"], "pending");
    assert_eq!(body["task"]["priority"], 2);
    assert!(body["task"]["due_date"].as_str().unwrap().starts_with("2025-03-10"));
}

#[tokio::test]
async fn test_create_with_empty_title_is_bad_request() {
    let (status, body) = send(&app(), Method::POST, "/api/tasks", Some(json!({"title": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["status"], 400);
    assert_eq!(body["error"], "title must not be empty");
}

#[tokio::test]
async fn test_invalid_id_and_missing_task() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/tasks/-10", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(&app, Method::DELETE, "/api/tasks/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_partial_update() {
    let app = app();
    let (_, created) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({"title": "A", "priority": 1, "description": "keep me"})),
    )
    .await;
    let id = created["task_id"].as_u64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/tasks/{id}"),
        Some(json!({"status": "done"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task updated successfully");
    assert_eq!(body["task"]["title"], "A");
    assert_eq!(body["task"]["priority"], 1);
    assert_eq!(body["task"]["description"], "keep me");
    assert_eq!(body["task"]["status"], "done");

    let (status, body) = send(&app, Method::PUT, &format!("/api/tasks/{id}"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("at least one field"));
}

#[tokio::test]
async fn test_delete_removes_task() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/api/tasks", Some(json!({"title": "Gone soon"}))).await;
    let id = created["task_id"].as_u64().unwrap();

    let (status, body) = send(&app, Method::DELETE, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted successfully");

    let (status, _) = send(&app, Method::GET, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_with_filters_and_sorting() {
    let app = app();
    for (title, status, due) in [
        ("Task one", "done", "2025-02-10"),
        ("Task two", "pending", "2025-03-10"),
        ("Chore", "done", "2025-01-05"),
    ] {
        send(
            &app,
            Method::POST,
            "/api/tasks",
            Some(json!({"title": title, "status": status, "due_date": due})),
        )
        .await;
    }

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/tasks?sort_by=due_date&sort_order=desc&limit=2",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Tasks retrieved successfully");
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Task two", "Task one"]);
    assert_eq!(body["pagination"]["limit"], 2);
    assert_eq!(body["pagination"]["offset"], 0);
    assert_eq!(body["pagination"]["total_tasks"], 3);
    assert_eq!(body["sorting"]["by"], "due_date");
    assert_eq!(body["sorting"]["order"], "DESC");

    let (status, body) = send(&app, Method::GET, "/api/tasks?title_contains=Task&status=done", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "Task one");
}

#[tokio::test]
async fn test_list_rejects_bad_page_params() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/tasks?sort_by=author", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "invalid 'sortBy' value. Valid values: [id title status priority created_at due_date]"
    );

    let (status, _) = send(&app, Method::GET, "/api/tasks?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/api/tasks?priority=high", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid priority filter: must be positive integer");
}

#[tokio::test]
async fn test_undecodable_body_is_bad_request() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({"title": "x", "priority": -1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().starts_with("invalid request body"));

    let (_, created) = send(&app, Method::POST, "/api/tasks", Some(json!({"title": "A"}))).await;
    let id = created["task_id"].as_u64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/tasks/{id}"),
        Some(json!({"priority": "high"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["error"].as_str().unwrap().starts_with("invalid request body"));
}
