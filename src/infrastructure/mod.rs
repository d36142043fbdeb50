//! Infrastructure layer - external concerns

pub mod database;
pub mod seed;
pub mod storage;

pub use database::repositories::SeaOrmRepositoryProvider;
pub use database::{init_and_migrate, init_database, DatabaseConfig};
pub use seed::{load_events_file, sample_events};
pub use storage::InMemoryRepositoryProvider;
