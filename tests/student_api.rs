//! Student API Contract Tests
//!
//! Drives the full router in-process and checks the mapping between
//! HTTP verbs, validation, storage effects and status codes.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use students_api::http_server::{HttpServer, HttpServerConfig};
use students_api::storage::{SqliteStorage, StudentStorage};
use tower::ServiceExt;

// =============================================================================
// Test Utilities
// =============================================================================

fn create_test_app() -> (Router, SqliteStorage) {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let server = HttpServer::with_storage(HttpServerConfig::default(), Arc::new(storage.clone()));
    (server.router(), storage)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(text) => {
            builder = builder.header("content-type", "application/json");
            Body::from(text.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_student(app: &Router, name: &str, email: &str, age: i64) -> i64 {
    let body = json!({"name": name, "email": email, "age": age}).to_string();
    let (status, value) = send(app, "POST", "/api/students", Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);
    value["id"].as_i64().unwrap()
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_then_get_returns_same_record() {
    let (app, _) = create_test_app();

    let id = create_student(&app, "Ann", "ann@x.com", 20).await;
    let (status, value) = send(&app, "GET", &format!("/api/students/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        value,
        json!({"id": id, "name": "Ann", "email": "ann@x.com", "age": 20})
    );
}

#[tokio::test]
async fn test_create_empty_body_is_bad_request() {
    let (app, storage) = create_test_app();

    let (status, value) = send(&app, "POST", "/api/students", Some("")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value, json!({"status": "Error", "error": "empty body"}));
    assert_eq!(storage.count().unwrap(), 0);
}

#[tokio::test]
async fn test_create_malformed_json_inserts_nothing() {
    let (app, storage) = create_test_app();

    for body in ["{", "not json", "[1, 2", r#"{"name": "Ann", "age": "old"}"#] {
        let (status, value) = send(&app, "POST", "/api/students", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(value["status"], "Error");
    }

    assert_eq!(storage.count().unwrap(), 0);
}

#[tokio::test]
async fn test_create_reports_three_field_violations() {
    let (app, storage) = create_test_app();

    let body = json!({"name": "", "email": "not-an-email", "age": -5}).to_string();
    let (status, value) = send(&app, "POST", "/api/students", Some(&body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = value["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "email", "age"]);
    assert_eq!(storage.count().unwrap(), 0);
}

#[tokio::test]
async fn test_create_ignores_client_id() {
    let (app, _) = create_test_app();

    let body = json!({"id": 500, "name": "Ann", "email": "ann@x.com", "age": 20}).to_string();
    let (status, value) = send(&app, "POST", "/api/students", Some(&body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(value, json!({"id": 1}));
}

#[tokio::test]
async fn test_create_stores_trimmed_fields() {
    let (app, storage) = create_test_app();

    let body = json!({"name": " Ann ", "email": "  ann@x.com  ", "age": 20}).to_string();
    let (status, value) = send(&app, "POST", "/api/students", Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let id = value["id"].as_i64().unwrap();
    let stored = storage.get_by_id(id).unwrap();
    assert_eq!(stored.name, "Ann");
    assert_eq!(stored.email, "ann@x.com");
}

#[tokio::test]
async fn test_create_rejects_dotless_domain() {
    let (app, storage) = create_test_app();

    let body = json!({"name": "Ann", "email": "ann@localhost", "age": 20}).to_string();
    let (status, value) = send(&app, "POST", "/api/students", Some(&body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["fields"][0]["constraint"], "email");
    assert_eq!(storage.count().unwrap(), 0);
}

// =============================================================================
// Read
// =============================================================================

#[tokio::test]
async fn test_list_empty_table() {
    let (app, _) = create_test_app();

    for uri in ["/api/students", "/api/students/"] {
        let (status, value) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value, json!([]));
    }
}

#[tokio::test]
async fn test_list_in_insertion_order() {
    let (app, _) = create_test_app();

    create_student(&app, "Ann", "ann@x.com", 20).await;
    create_student(&app, "Bob", "bob@x.com", 30).await;

    let (status, value) = send(&app, "GET", "/api/students/", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ann", "Bob"]);
}

#[tokio::test]
async fn test_get_bad_id_is_bad_request() {
    let (app, _) = create_test_app();

    let (status, value) = send(&app, "GET", "/api/students/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["status"], "Error");
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let (app, _) = create_test_app();

    let (status, value) = send(&app, "GET", "/api/students/77", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["error"], "no student found with id 77");
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_overwrites_and_preserves_id() {
    let (app, _) = create_test_app();
    let id = create_student(&app, "Ann", "ann@x.com", 20).await;

    let body = json!({"name": "Anna", "email": "anna@y.org", "age": 21}).to_string();
    let (status, value) = send(&app, "PUT", &format!("/api/students/{id}"), Some(&body)).await;

    let expected = json!({"id": id, "name": "Anna", "email": "anna@y.org", "age": 21});
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, expected);

    let (_, fetched) = send(&app, "GET", &format!("/api/students/{id}"), None).await;
    assert_eq!(fetched, expected);
}

#[tokio::test]
async fn test_update_stores_trimmed_fields() {
    let (app, storage) = create_test_app();
    let id = create_student(&app, "Ann", "ann@x.com", 20).await;

    let body = json!({"name": "Anna ", "email": " anna@y.org\n", "age": 21}).to_string();
    let (status, value) = send(&app, "PUT", &format!("/api/students/{id}"), Some(&body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["email"], "anna@y.org");
    assert_eq!(storage.get_by_id(id).unwrap().name, "Anna");
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let (app, _) = create_test_app();

    let body = json!({"name": "Anna", "email": "anna@y.org", "age": 21}).to_string();
    let (status, _) = send(&app, "PUT", "/api/students/12", Some(&body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rejects_invalid_fields() {
    let (app, _) = create_test_app();
    let id = create_student(&app, "Ann", "ann@x.com", 20).await;

    let body = json!({"name": "Ann", "email": "broken", "age": 20}).to_string();
    let (status, value) = send(&app, "PUT", &format!("/api/students/{id}"), Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["fields"][0]["field"], "email");

    let (_, fetched) = send(&app, "GET", &format!("/api/students/{id}"), None).await;
    assert_eq!(fetched["email"], "ann@x.com");
}

#[tokio::test]
async fn test_update_malformed_json_is_bad_request() {
    let (app, _) = create_test_app();
    let id = create_student(&app, "Ann", "ann@x.com", 20).await;

    let (status, _) = send(&app, "PUT", &format!("/api/students/{id}"), Some("{oops")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_missing_leaves_rows() {
    let (app, storage) = create_test_app();
    create_student(&app, "Ann", "ann@x.com", 20).await;

    let (status, value) = send(&app, "DELETE", "/api/students/99", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["error"], "student with id 99 not found");
    assert_eq!(storage.count().unwrap(), 1);
}

#[tokio::test]
async fn test_delete_bad_id_is_bad_request() {
    let (app, _) = create_test_app();

    let (status, _) = send(&app, "DELETE", "/api/students/one", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_full_lifecycle() {
    let (app, _) = create_test_app();

    let id = create_student(&app, "Ann", "ann@x.com", 20).await;
    assert_eq!(id, 1);

    let (status, value) = send(&app, "GET", "/api/students/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"id": 1, "name": "Ann", "email": "ann@x.com", "age": 20}));

    let (status, value) = send(&app, "DELETE", "/api/students/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"message": "student deleted successfully"}));

    let (status, _) = send(&app, "GET", "/api/students/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Concurrency and surface
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_get_distinct_ids() {
    let (app, storage) = create_test_app();

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                create_student(&app, &format!("student{i}"), &format!("s{i}@x.com"), 20).await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap());
    }
    ids.sort_unstable();
    ids.dedup();

    assert_eq!(ids.len(), 16);
    assert_eq!(storage.count().unwrap(), 16);
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = create_test_app();

    let (status, value) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "ok");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_error_responses_are_json() {
    let (app, _) = create_test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/api/students/zzz")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers()["content-type"], "application/json");
}
