//! Events module: public ceremony listing with live registration counts

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
