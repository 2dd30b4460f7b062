//! Gateway middleware

pub mod actor;
pub mod rate_limit;
