//! Seed module: loading events into the store

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
