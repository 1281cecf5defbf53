//! Fitness Progress Shared Library
//!
//! Pure progress analytics: the data model for logged sessions and
//! nutrition, streaks, personal records and weekly rollups. Nothing in this
//! crate performs I/O; the backend feeds it data fetched from the session
//! store.

pub mod errors;
pub mod models;
pub mod records;
pub mod streak;
pub mod types;
pub mod validation;
pub mod weekly;

// Re-export commonly used items
pub use errors::*;
pub use models::*;
pub use types::*;
