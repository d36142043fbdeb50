//! Database entities module

pub mod event;
pub mod registration;

pub use event::Entity as Event;
pub use registration::Entity as Registration;
