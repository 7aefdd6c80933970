//! Domain error types
//!
//! Infrastructure errors (local storage, remote store) live next to the
//! code that produces them in the engine crate; the types here are the
//! business-rule failures shared across crate boundaries.

use thiserror::Error;

/// One or more business-rule violations found while assembling an order.
///
/// All checks run; violations are accumulated rather than fail-fast so the
/// caller can surface the full list to the customer at once. No partial
/// order exists when this error is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("validation failed: {}", violations.join("; "))]
pub struct ValidationError {
    pub violations: Vec<String>,
}

impl ValidationError {
    pub fn new(violations: Vec<String>) -> Self {
        Self { violations }
    }

    /// True if any violation message contains the given fragment.
    pub fn mentions(&self, fragment: &str) -> bool {
        self.violations.iter().any(|v| v.contains(fragment))
    }
}

/// An unrecognized order status value, rejected before any write.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid order status: {0:?}")]
pub struct InvalidStatusError(pub String);

/// Identity enrichment failure.
///
/// Callers in the order path swallow this class: a missing or failing
/// session degrades to an anonymous order, never to a failed one.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    #[error("no active session")]
    NoSession,
    #[error("profile not found for owner {0}")]
    ProfileNotFound(String),
    #[error("identity provider error: {0}")]
    Provider(String),
}
