//! Registration repository interface

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::model::{NewRegistration, Registration};
use crate::domain::DomainResult;

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// `email` must already be normalized
    async fn find_by_event_and_email(
        &self,
        event_id: i32,
        email: &str,
    ) -> DomainResult<Option<Registration>>;

    /// All registrations, newest first
    async fn find_all(&self) -> DomainResult<Vec<Registration>>;

    async fn count(&self) -> DomainResult<u64>;

    async fn count_for_event(&self, event_id: i32) -> DomainResult<u64>;

    /// Registration count per referenced event id (events with none are absent)
    async fn count_by_event(&self) -> DomainResult<BTreeMap<i32, u64>>;

    /// Store a registration.
    ///
    /// The (event, email) pair is checked atomically with the write and a
    /// clash yields `DuplicateRegistration`. With `capacity` set, the write
    /// is also refused with `EventFull` once the event already holds that
    /// many registrations.
    async fn insert(
        &self,
        registration: NewRegistration,
        capacity: Option<u32>,
    ) -> DomainResult<Registration>;
}
