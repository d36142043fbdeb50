//! Registration domain entity

use chrono::{DateTime, Utc};

/// One participant's confirmed claim on one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Storage-assigned identifier
    pub id: i32,
    pub event_id: i32,
    /// Always lowercase
    pub email: String,
    /// Trimmed display name
    pub name: String,
    pub registered_at: DateTime<Utc>,
}

/// A registration that has been admitted but not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub event_id: i32,
    pub email: String,
    pub name: String,
    pub registered_at: DateTime<Utc>,
}

impl NewRegistration {
    /// Normalizes the email to lowercase and trims the name.
    pub fn new(event_id: i32, email: &str, name: &str) -> Self {
        Self {
            event_id,
            email: normalize_email(email),
            name: name.trim().to_string(),
            registered_at: Utc::now(),
        }
    }

    pub fn into_registration(self, id: i32) -> Registration {
        Registration {
            id,
            event_id: self.event_id,
            email: self.email,
            name: self.name,
            registered_at: self.registered_at,
        }
    }
}

/// Canonical form used for the (event, email) uniqueness key.
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}
