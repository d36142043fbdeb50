//! Event repository interface

use async_trait::async_trait;

use super::model::Event;
use crate::domain::DomainResult;

/// Outcome of a bulk event import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportReport {
    pub deleted: u64,
    pub inserted: u64,
    pub total: u64,
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Event>>;

    /// All events ordered by id ascending
    async fn find_all(&self) -> DomainResult<Vec<Event>>;

    async fn count(&self) -> DomainResult<u64>;

    /// Insert events; ids must not already exist
    async fn insert_many(&self, events: Vec<Event>) -> DomainResult<u64>;

    /// Drop every stored event and load `events` in their place.
    ///
    /// Registrations are left untouched, so some may end up referencing
    /// events that no longer exist.
    async fn replace_all(&self, events: Vec<Event>) -> DomainResult<ImportReport>;
}
