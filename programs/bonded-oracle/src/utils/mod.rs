//! Shared utilities

pub mod hashing;
pub mod validation;
pub mod version;
