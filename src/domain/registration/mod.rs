//! Registration aggregate
//!
//! Contains the Registration entity, the form submission rules,
//! and the repository interface.

pub mod model;
pub mod repository;
pub mod submission;

pub use model::{normalize_email, NewRegistration, Registration};
pub use repository::RegistrationRepository;
pub use submission::{validate_submission, RegistrationSubmission, ValidSubmission};
