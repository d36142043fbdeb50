//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod event_repository;
pub mod registration_repository;
pub mod repository_provider;

pub use event_repository::SeaOrmEventRepository;
pub use registration_repository::SeaOrmRegistrationRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
