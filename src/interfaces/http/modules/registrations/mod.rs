//! Registrations module: admission endpoint and admin listing

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
