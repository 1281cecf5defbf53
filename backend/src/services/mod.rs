//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the session store and the pure analytics engine.

pub mod analytics;
pub mod export;
pub mod records;

pub use analytics::{AnalyticsService, SummarySettings};
pub use export::ExportService;
pub use records::{
    LogEntryInput, LogSessionInput, LoggedSession, PersonalRecordTracker, ProgressService,
};
