pub mod capacity;
pub mod event;
pub mod registration;
pub mod report;
pub mod repositories;

// Re-export commonly used types
pub use capacity::{CapacityClass, CapacityPolicy, DEFAULT_STANDARD_CAPACITY};
pub use event::{Event, EventRepository, EventSummary, ImportReport};
pub use registration::{
    normalize_email, validate_submission, NewRegistration, Registration, RegistrationRepository,
    RegistrationSubmission, ValidSubmission,
};
pub use report::{EventRegistrationGroup, EventWithCount, RegistrationWithEvent, Statistics};
pub use repositories::{DomainResult, RepositoryProvider};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::{DomainError, FieldErrors};
