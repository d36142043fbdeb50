//! # Graduation Registration Service
//!
//! Registration for graduation ceremonies: a public event list, an
//! admission endpoint that enforces per-event uniqueness and capacity, and
//! an admin report joining registrations to events.
//!
//! ## Architecture
//!
//! - **domain**: entities, validation rules, capacity policy, read models and
//!   repository traits
//! - **application**: registration, reporting and event import services
//! - **infrastructure**: SQLite (SeaORM) and in-memory storage, events file
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime bootstrap and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError};

// Re-export storage types for easy access
pub use infrastructure::{
    init_and_migrate, init_database, DatabaseConfig, InMemoryRepositoryProvider,
    SeaOrmRepositoryProvider,
};

// Re-export API router
pub use interfaces::http::{create_api_router, AppState};
