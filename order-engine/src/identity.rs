//! Identity lookup seam
//!
//! The engine never requires an account: identity is optional enrichment
//! resolved at order-assembly time, and every failure in this module is
//! swallowed by the builder (the order degrades to anonymous).

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::error::LookupError;
use shared::models::UserProfile;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// External identity collaborator: "current session owner or none" plus
/// an async profile fetch by owner id.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Owner id of the current session, if any.
    async fn current_owner(&self) -> Option<String>;

    /// Fetch the stored profile for an owner.
    async fn fetch_profile(&self, owner_id: &str) -> Result<UserProfile, LookupError>;
}

/// Identity provider backed by the `user` collection of the shared store.
///
/// Session state itself is owned by the auth layer; this type only holds
/// whatever owner id that layer last handed over.
pub struct StoreIdentityProvider {
    db: Surreal<Db>,
    session: RwLock<Option<String>>,
}

impl StoreIdentityProvider {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            db,
            session: RwLock::new(None),
        }
    }

    /// Update the session owner (None on sign-out).
    pub fn set_session(&self, owner_id: Option<String>) {
        *self.session.write() = owner_id;
    }
}

#[async_trait]
impl IdentityProvider for StoreIdentityProvider {
    async fn current_owner(&self) -> Option<String> {
        self.session.read().clone()
    }

    async fn fetch_profile(&self, owner_id: &str) -> Result<UserProfile, LookupError> {
        let profile: Option<UserProfile> = self
            .db
            .select(("user", owner_id))
            .await
            .map_err(|e| LookupError::Provider(e.to_string()))?;
        profile.ok_or_else(|| LookupError::ProfileNotFound(owner_id.to_string()))
    }
}

/// Fixed-response provider for tests and offline operation.
pub struct MockIdentityProvider {
    pub owner: Option<String>,
    pub profile: Option<UserProfile>,
    /// Force `fetch_profile` to fail even when a profile is configured
    pub fail_lookup: bool,
}

impl MockIdentityProvider {
    /// No session at all: every order built against this is anonymous.
    pub fn anonymous() -> Self {
        Self {
            owner: None,
            profile: None,
            fail_lookup: false,
        }
    }

    pub fn signed_in(owner: &str, profile: UserProfile) -> Self {
        Self {
            owner: Some(owner.to_string()),
            profile: Some(profile),
            fail_lookup: false,
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn current_owner(&self) -> Option<String> {
        self.owner.clone()
    }

    async fn fetch_profile(&self, owner_id: &str) -> Result<UserProfile, LookupError> {
        if self.fail_lookup {
            return Err(LookupError::Provider("mock lookup failure".to_string()));
        }
        self.profile
            .clone()
            .ok_or_else(|| LookupError::ProfileNotFound(owner_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_provider_reads_user_collection() {
        let db = crate::db::open_in_memory().await.unwrap();
        let _: Option<UserProfile> = db
            .create(("user", "uid-1"))
            .content(UserProfile {
                display_name: "Budi".to_string(),
                email: Some("budi@example.com".to_string()),
                profile_complete: true,
            })
            .await
            .unwrap();

        let provider = StoreIdentityProvider::new(db);
        assert!(provider.current_owner().await.is_none());

        provider.set_session(Some("uid-1".to_string()));
        assert_eq!(provider.current_owner().await.as_deref(), Some("uid-1"));

        let profile = provider.fetch_profile("uid-1").await.unwrap();
        assert_eq!(profile.display_name, "Budi");

        let err = provider.fetch_profile("uid-404").await.unwrap_err();
        assert!(matches!(err, LookupError::ProfileNotFound(_)));
    }
}
