//! In-memory storage implementation

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::report::sort_newest_first;
use crate::domain::{
    DomainError, DomainResult, Event, EventRepository, ImportReport, NewRegistration,
    Registration, RegistrationRepository, RepositoryProvider,
};

/// In-memory events keyed by id.
///
/// A single lock over the whole set: `replace_all` swaps in the new set
/// under the write guard, so readers see either the old events or the new.
#[derive(Default)]
pub struct InMemoryEventRepository {
    events: RwLock<BTreeMap<i32, Event>>,
}

/// In-memory registrations grouped per event.
///
/// Grouping by event id means the duplicate and capacity checks run under
/// the same shard lock as the push, so they cannot interleave with another
/// admission for that event.
pub struct InMemoryRegistrationRepository {
    by_event: DashMap<i32, Vec<Registration>>,
    id_counter: AtomicI32,
}

impl InMemoryRegistrationRepository {
    pub fn new() -> Self {
        Self {
            by_event: DashMap::new(),
            id_counter: AtomicI32::new(1),
        }
    }
}

impl Default for InMemoryRegistrationRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-local storage for development and testing. Data is lost on exit.
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    events: InMemoryEventRepository,
    registrations: InMemoryRegistrationRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn events(&self) -> &dyn EventRepository {
        &self.events
    }

    fn registrations(&self) -> &dyn RegistrationRepository {
        &self.registrations
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Event>> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<Event>> {
        Ok(self.events.read().await.values().cloned().collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.events.read().await.len() as u64)
    }

    async fn insert_many(&self, events: Vec<Event>) -> DomainResult<u64> {
        let mut stored = self.events.write().await;
        if let Some(existing) = events.iter().find(|e| stored.contains_key(&e.id)) {
            return Err(DomainError::StorageUnavailable(format!(
                "Event {} already exists",
                existing.id
            )));
        }
        let inserted = events.len() as u64;
        stored.extend(events.into_iter().map(|e| (e.id, e)));
        Ok(inserted)
    }

    async fn replace_all(&self, events: Vec<Event>) -> DomainResult<ImportReport> {
        let inserted = events.len() as u64;
        let replacement: BTreeMap<i32, Event> = events.into_iter().map(|e| (e.id, e)).collect();

        let mut stored = self.events.write().await;
        let deleted = stored.len() as u64;
        *stored = replacement;
        let total = stored.len() as u64;
        drop(stored);

        debug!(deleted, inserted, "Replaced in-memory events");
        Ok(ImportReport {
            deleted,
            inserted,
            total,
        })
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryRegistrationRepository {
    async fn find_by_event_and_email(
        &self,
        event_id: i32,
        email: &str,
    ) -> DomainResult<Option<Registration>> {
        Ok(self
            .by_event
            .get(&event_id)
            .and_then(|regs| regs.iter().find(|r| r.email == email).cloned()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Registration>> {
        let mut all: Vec<Registration> = self
            .by_event
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect();
        sort_newest_first(&mut all);
        Ok(all)
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.by_event.iter().map(|e| e.value().len() as u64).sum())
    }

    async fn count_for_event(&self, event_id: i32) -> DomainResult<u64> {
        Ok(self
            .by_event
            .get(&event_id)
            .map(|regs| regs.len() as u64)
            .unwrap_or(0))
    }

    async fn count_by_event(&self) -> DomainResult<BTreeMap<i32, u64>> {
        Ok(self
            .by_event
            .iter()
            .filter(|e| !e.value().is_empty())
            .map(|e| (*e.key(), e.value().len() as u64))
            .collect())
    }

    async fn insert(
        &self,
        registration: NewRegistration,
        capacity: Option<u32>,
    ) -> DomainResult<Registration> {
        let mut regs = self.by_event.entry(registration.event_id).or_default();

        if regs.iter().any(|r| r.email == registration.email) {
            return Err(DomainError::DuplicateRegistration {
                event_id: registration.event_id,
                email: registration.email,
            });
        }
        if let Some(limit) = capacity {
            if regs.len() as u64 >= u64::from(limit) {
                return Err(DomainError::EventFull {
                    event_id: registration.event_id,
                    capacity: limit,
                });
            }
        }

        let id = self.id_counter.fetch_add(1, Ordering::SeqCst);
        let stored = registration.into_registration(id);
        regs.push(stored.clone());
        Ok(stored)
    }
}
