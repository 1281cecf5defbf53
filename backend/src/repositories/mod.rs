//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod exercise;
pub mod nutrition;
pub mod sessions;
pub mod user;

pub use exercise::{
    ExerciseMaxRecord, ExerciseNameRecord, ExerciseRepository, PersonalRecordRepository,
};
pub use nutrition::{NutritionLogRecord, NutritionLogRepository};
pub use sessions::{
    CreateSession, CreateSessionEntry, SessionEntryRecord, SessionRecord, SessionRepository,
};
pub use user::UserRepository;
