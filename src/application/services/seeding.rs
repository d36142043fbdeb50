//! Populating the event store

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{DomainError, DomainResult, ImportReport, RepositoryProvider};
use crate::infrastructure::seed::{load_events_file, sample_events};

/// Outcome of a sample seed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSeed {
    /// The store already held this many events and was left alone
    AlreadyPopulated(u64),
    /// The sample set was written
    Seeded(u64),
}

/// Imports events from the extracted events file or the built-in sample.
pub struct EventImportService {
    repos: Arc<dyn RepositoryProvider>,
    events_file: PathBuf,
}

impl EventImportService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, events_file: impl Into<PathBuf>) -> Self {
        Self {
            repos,
            events_file: events_file.into(),
        }
    }

    /// Replace every stored event with the contents of the events file.
    ///
    /// The file is fully parsed before anything is deleted, so a bad file
    /// leaves the store untouched. Registrations are kept.
    pub async fn import_from_file(&self) -> DomainResult<ImportReport> {
        let events = load_events_file(&self.events_file)
            .map_err(|e| DomainError::ImportFailed(e.to_string()))?;
        let report = self.repos.events().replace_all(events).await?;
        info!(
            deleted = report.deleted,
            inserted = report.inserted,
            total = report.total,
            "Events imported from {}",
            self.events_file.display()
        );
        Ok(report)
    }

    /// Write the sample events, but only into an empty store.
    pub async fn seed_sample_if_empty(&self) -> DomainResult<SampleSeed> {
        let existing = self.repos.events().count().await?;
        if existing > 0 {
            return Ok(SampleSeed::AlreadyPopulated(existing));
        }
        let inserted = self.repos.events().insert_many(sample_events()).await?;
        info!("Seeded {} sample events", inserted);
        Ok(SampleSeed::Seeded(inserted))
    }

    /// Startup seeding: import the events file into an empty store, or fall
    /// back to the sample set when the file cannot be read.
    ///
    /// Returns the number of events written (0 when the store was already
    /// populated).
    pub async fn seed_on_startup(&self) -> DomainResult<u64> {
        let existing = self.repos.events().count().await?;
        if existing > 0 {
            info!("Event store already holds {} events, skipping seed", existing);
            return Ok(0);
        }

        match load_events_file(&self.events_file) {
            Ok(events) => Ok(self.repos.events().insert_many(events).await?),
            Err(e) => {
                warn!(
                    "Could not load {}: {}. Seeding sample events instead",
                    self.events_file.display(),
                    e
                );
                match self.seed_sample_if_empty().await? {
                    SampleSeed::Seeded(n) => Ok(n),
                    SampleSeed::AlreadyPopulated(_) => Ok(0),
                }
            }
        }
    }
}
