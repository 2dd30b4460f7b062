//! Quillpress Common Library
//!
//! Shared code for the Quillpress services including:
//! - Database models and repository pattern
//! - Role and permission policy
//! - Moderation workflow state machine
//! - Error types and handling
//! - Configuration management
//! - Authentication utilities
//! - Metrics and observability

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod moderation;
pub mod policy;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::Repository;
pub use errors::{AppError, Result};
pub use policy::{Actor, Role};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default rating score when a submitted score is missing or invalid
pub const DEFAULT_RATING_SCORE: i16 = 5;

/// Number of recently liked articles shown on the profile page
pub const PROFILE_LIKED_LIMIT: u64 = 10;
