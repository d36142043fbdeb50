use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Field-level validation messages, keyed by field name.
///
/// Every violated field is recorded so a form can show all messages at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            for e in errs.iter() {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                out.add(field.to_string(), msg);
            }
        }
        out
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for msg in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, msg)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Invalid input data: {0}")]
    Validation(FieldErrors),

    #[error("Event {0} not found")]
    EventNotFound(i32),

    #[error("{email} is already registered for event {event_id}")]
    DuplicateRegistration { event_id: i32, email: String },

    #[error("Event {event_id} has reached maximum capacity ({capacity} registrations)")]
    EventFull { event_id: i32, capacity: u32 },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The events file could not be loaded; the store was not touched
    #[error("Event import failed: {0}")]
    ImportFailed(String),
}

impl DomainError {
    /// Stable machine-readable code for the error.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation_error",
            DomainError::EventNotFound(_) => "event_not_found",
            DomainError::DuplicateRegistration { .. } => "duplicate_registration",
            DomainError::EventFull { .. } => "event_full",
            DomainError::StorageUnavailable(_) => "storage_unavailable",
            DomainError::ImportFailed(_) => "import_failed",
        }
    }

    /// Whether this is an expected business-rule rejection rather than a
    /// system failure.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            DomainError::StorageUnavailable(_) | DomainError::ImportFailed(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid events file: {0}")]
    InvalidEventsFile(String),
}

impl From<InfraError> for DomainError {
    fn from(e: InfraError) -> Self {
        DomainError::StorageUnavailable(e.to_string())
    }
}
