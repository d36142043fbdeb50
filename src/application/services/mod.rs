//! Application services

pub mod registration;
pub mod reporting;
pub mod seeding;

pub use registration::RegistrationService;
pub use reporting::{RegistrationsReport, ReportingService};
pub use seeding::{EventImportService, SampleSeed};
