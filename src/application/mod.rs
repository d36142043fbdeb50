//! Use cases built on the domain and its repositories

pub mod services;

pub use services::{
    EventImportService, RegistrationService, RegistrationsReport, ReportingService, SampleSeed,
};
