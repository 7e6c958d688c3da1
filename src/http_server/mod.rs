//! # Students HTTP Server Module
//!
//! Axum server exposing CRUD over the student table.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/students` - Create and list students
//! - `/api/students/{id}` - Read, update and delete one student

pub mod config;
pub mod errors;
pub mod observability_routes;
pub mod response;
pub mod server;
pub mod student_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::{shutdown_signal, HttpServer};
pub use student_routes::{student_routes, StudentsState};
