//! Common types for the shared crate

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Money type (minor currency units, i.e. whole Rupiah)
pub type Money = i64;
