//! User Profile Model

use serde::{Deserialize, Serialize};

/// `user` collection record, keyed by owner id. Consumed by identity
/// lookup for optional order enrichment; never required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub display_name: String,
    pub email: Option<String>,
    #[serde(default)]
    pub profile_complete: bool,
}
