//! students-api - JSON CRUD over a SQLite `students` table
//!
//! Request flow: router -> handler -> decode + validate -> storage -> response.

pub mod cli;
pub mod http_server;
pub mod model;
pub mod observability;
pub mod storage;
