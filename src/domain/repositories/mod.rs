//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to the event and registration stores
//! - `DomainResult`: standard result type for domain operations

use super::event::EventRepository;
use super::registration::RegistrationRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// One implementation is chosen at startup (SQLite or in-memory) and shared
/// behind an `Arc<dyn RepositoryProvider>`:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let event = repos.events().find_by_id(1).await?;
///     let taken = repos.registrations().count_for_event(1).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn events(&self) -> &dyn EventRepository;
    fn registrations(&self) -> &dyn RegistrationRepository;

    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;
}
