//! Read-side aggregation over events and registrations

use std::sync::Arc;

use crate::domain::report::{self, EventWithCount, RegistrationWithEvent, Statistics};
use crate::domain::{CapacityPolicy, DomainResult, RepositoryProvider};

/// Everything the admin view shows, read in one pass.
#[derive(Debug, Clone)]
pub struct RegistrationsReport {
    pub registrations: Vec<RegistrationWithEvent>,
    pub statistics: Statistics,
}

pub struct ReportingService {
    repos: Arc<dyn RepositoryProvider>,
    policy: CapacityPolicy,
}

impl ReportingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, policy: CapacityPolicy) -> Self {
        Self { repos, policy }
    }

    /// Every event with its registration count, by event id.
    pub async fn list_events_with_counts(&self) -> DomainResult<Vec<EventWithCount>> {
        let (events, counts) = tokio::try_join!(
            self.repos.events().find_all(),
            self.repos.registrations().count_by_event(),
        )?;
        Ok(report::events_with_counts(events, &counts, &self.policy))
    }

    /// Every registration, newest first, with its event if it resolves.
    pub async fn list_registrations_with_events(&self) -> DomainResult<Vec<RegistrationWithEvent>> {
        let (events, registrations) = tokio::try_join!(
            self.repos.events().find_all(),
            self.repos.registrations().find_all(),
        )?;
        Ok(report::join_registrations(registrations, &events))
    }

    pub async fn compute_statistics(&self) -> DomainResult<Statistics> {
        let (events, registrations) = tokio::try_join!(
            self.repos.events().find_all(),
            self.repos.registrations().find_all(),
        )?;
        Ok(report::compute_statistics(&events, &registrations))
    }

    /// Listing and statistics built from the same snapshot of both stores.
    pub async fn registrations_report(&self) -> DomainResult<RegistrationsReport> {
        let (events, registrations) = tokio::try_join!(
            self.repos.events().find_all(),
            self.repos.registrations().find_all(),
        )?;
        let statistics = report::compute_statistics(&events, &registrations);
        Ok(RegistrationsReport {
            registrations: report::join_registrations(registrations, &events),
            statistics,
        })
    }
}
