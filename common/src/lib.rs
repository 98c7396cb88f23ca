pub mod config;
pub mod errors;
pub mod repository;
pub mod util;

pub use repository::*;

/// Users are keyed by an opaque string id stored in `_id`.
pub type UserId = String;
