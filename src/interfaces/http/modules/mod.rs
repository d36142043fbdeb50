//! Route modules, one per resource

pub mod events;
pub mod health;
pub mod metrics;
pub mod registrations;
pub mod request_id;
pub mod seed;
