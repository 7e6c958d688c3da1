//! Student HTTP Routes
//!
//! One handler per operation. Each request moves through
//! decode -> validate -> storage -> response, and any failing stage
//! answers immediately with an error envelope.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::de::DeserializeOwned;
use tracing::info;

use super::errors::{ApiError, ApiResult};
use super::response::{CreatedResponse, MessageResponse};
use crate::model::{validator, Student, StudentId, StudentInput};
use crate::storage::{StorageError, StorageResult, StudentStorage};

// ==================
// Shared State
// ==================

/// State shared across student handlers
pub struct StudentsState {
    pub storage: Arc<dyn StudentStorage>,
}

impl StudentsState {
    pub fn new(storage: Arc<dyn StudentStorage>) -> Self {
        Self { storage }
    }

    /// Run a storage call on the blocking pool.
    async fn run<T, F>(&self, op: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn StudentStorage) -> StorageResult<T> + Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        let result = tokio::task::spawn_blocking(move || op(storage.as_ref()))
            .await
            .map_err(|e| StorageError::Unavailable(format!("storage task failed: {}", e)))?;
        Ok(result?)
    }
}

// ==================
// Student Routes
// ==================

/// Create student routes
///
/// The collection is served with and without a trailing slash.
pub fn student_routes(state: Arc<StudentsState>) -> Router {
    Router::new()
        .route(
            "/students",
            get(list_students_handler).post(create_student_handler),
        )
        .route(
            "/students/",
            get(list_students_handler).post(create_student_handler),
        )
        .route(
            "/students/:id",
            get(get_student_handler)
                .put(update_student_handler)
                .delete(delete_student_handler),
        )
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

fn decode_body<T: DeserializeOwned>(body: &Bytes) -> ApiResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::bad_request("empty body"));
    }

    serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("invalid JSON input: {}", e)))
}

fn parse_id(raw: &str) -> ApiResult<StudentId> {
    raw.parse::<StudentId>()
        .map_err(|e| ApiError::bad_request(format!("invalid student id `{}`: {}", raw, e)))
}

// ==================
// Handlers
// ==================

async fn create_student_handler(
    State(state): State<Arc<StudentsState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    info!("creating a student");

    let input = decode_body::<StudentInput>(&body)?.normalized();
    validator().validate(&input)?;

    let id = state.run(move |storage| storage.create(&input)).await?;
    info!(student_id = id, "student created");

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

async fn get_student_handler(
    State(state): State<Arc<StudentsState>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Student>> {
    info!(student_id = %raw_id, "getting a student");

    let id = parse_id(&raw_id)?;
    let student = state.run(move |storage| storage.get_by_id(id)).await?;

    Ok(Json(student))
}

async fn list_students_handler(
    State(state): State<Arc<StudentsState>>,
) -> ApiResult<Json<Vec<Student>>> {
    info!("getting all students");

    let students = state.run(|storage| storage.get_all()).await?;

    Ok(Json(students))
}

async fn update_student_handler(
    State(state): State<Arc<StudentsState>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Student>> {
    info!(student_id = %raw_id, "updating a student");

    let id = parse_id(&raw_id)?;
    let input = decode_body::<StudentInput>(&body)?.normalized();
    validator().validate(&input)?;

    let student = state
        .run(move |storage| storage.update_by_id(id, &input))
        .await?;

    Ok(Json(student))
}

async fn delete_student_handler(
    State(state): State<Arc<StudentsState>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    info!(student_id = %raw_id, "deleting a student");

    let id = parse_id(&raw_id)?;
    let deleted = state.run(move |storage| storage.delete_by_id(id)).await?;

    if !deleted {
        return Err(ApiError::NotFound(format!(
            "student with id {} not found",
            id
        )));
    }

    Ok(Json(MessageResponse::new("student deleted successfully")))
}
