//! HTTP REST API
//!
//! - `common`: response envelope, error mapping, body extractor
//! - `modules`: one module per resource (dto + handlers)
//! - `router`: route table, middleware stack and Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use common::ApiResponse;
pub use router::{create_api_router, ApiDoc, AppState};
