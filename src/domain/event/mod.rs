//! Event aggregate
//!
//! Ceremony reference data and its repository interface.

pub mod model;
pub mod repository;

pub use model::{Event, EventSummary};
pub use repository::{EventRepository, ImportReport};

#[cfg(test)]
pub(crate) use model::sample_event;
