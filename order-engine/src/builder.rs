//! OrderBuilder - validates a cart snapshot into an immutable order draft
//!
//! Validation is accumulated, not fail-fast: the caller gets every
//! violated rule in one `ValidationError`. Identity enrichment is
//! best-effort; the one failure class this module swallows.

use crate::config::Config;
use crate::identity::IdentityProvider;
use shared::error::ValidationError;
use shared::models::{
    Cart, CustomerInfo, Identity, Order, OrderItem, OrderMetadata, OrderStatus, Pricing,
    StatusTimestamps,
};
use shared::util::now_millis;
use std::sync::Arc;
use uuid::Uuid;

/// Customer-entered details at checkout.
#[derive(Debug, Clone)]
pub struct CustomerDetails {
    pub name: String,
    pub table_number: String,
}

/// Re-check an assembled draft before it is persisted (defense in depth;
/// the repository calls this on every save).
pub fn validate_order(order: &Order) -> Result<(), ValidationError> {
    let mut violations = Vec::new();
    if order.customer.name.trim().is_empty() {
        violations.push("customer name is required".to_string());
    }
    if order.customer.table_number.trim().is_empty() {
        violations.push("table number is required".to_string());
    }
    if order.items.is_empty() {
        violations.push("cart must not be empty".to_string());
    }
    if order.pricing.total <= 0 {
        violations.push("order total must be greater than zero".to_string());
    }
    if !order.pricing.is_consistent() {
        violations.push("pricing total does not match subtotal minus discount".to_string());
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(violations))
    }
}

pub struct OrderBuilder {
    identity: Arc<dyn IdentityProvider>,
    config: Config,
}

impl OrderBuilder {
    pub fn new(identity: Arc<dyn IdentityProvider>, config: Config) -> Self {
        Self { identity, config }
    }

    /// Assemble an immutable order draft from a cart snapshot.
    ///
    /// All validation rules run before anything else; on failure no
    /// partial order exists and no side effect has occurred. On success
    /// the draft carries `status = pending`, every status timestamp
    /// unset, and a fresh idempotency `request_id`.
    pub async fn create_order_data(
        &self,
        customer: CustomerDetails,
        cart: Cart,
        pricing: Pricing,
        promo_code: Option<&str>,
    ) -> Result<Order, ValidationError> {
        let mut violations = Vec::new();
        if customer.name.trim().is_empty() {
            violations.push("customer name is required".to_string());
        }
        if customer.table_number.trim().is_empty() {
            violations.push("table number is required".to_string());
        }
        if cart.is_empty() {
            violations.push("cart must not be empty".to_string());
        }
        if pricing.total <= 0 {
            violations.push("order total must be greater than zero".to_string());
        }
        if !pricing.is_consistent() {
            violations.push("pricing total does not match subtotal minus discount".to_string());
        }
        if !violations.is_empty() {
            return Err(ValidationError::new(violations));
        }

        let identity = self.resolve_identity().await;
        let now = now_millis();

        let items = cart
            .items
            .iter()
            .map(|i| OrderItem {
                name: i.name.clone(),
                unit_price: i.unit_price,
                quantity: i.quantity,
                subtotal: i.line_total(),
                notes: i.notes.clone(),
                category: i.category.clone(),
                image_ref: i.image_ref.clone(),
            })
            .collect();

        let pricing = Pricing {
            promo_code: promo_code
                .map(|c| c.trim().to_ascii_lowercase())
                .filter(|c| !c.is_empty())
                .or(pricing.promo_code),
            ..pricing
        };

        Ok(Order {
            id: None,
            // millisecond timestamp: monotonic within this process, not
            // globally unique across clients
            order_number: format!("{}{}", self.config.order_number_prefix, now),
            request_id: Uuid::new_v4().to_string(),
            customer: CustomerInfo {
                name: customer.name.trim().to_string(),
                table_number: customer.table_number.trim().to_string(),
                identity,
            },
            items,
            pricing,
            status: OrderStatus::Pending,
            status_timestamps: StatusTimestamps::default(),
            metadata: OrderMetadata {
                source: self.config.order_source.clone(),
                submitted_at: now,
                locale: self.config.order_locale.clone(),
            },
        })
    }

    /// Best-effort identity resolution. No session or a failed lookup
    /// yields an anonymous order; the failure is logged and dropped.
    async fn resolve_identity(&self) -> Option<Identity> {
        let owner = self.identity.current_owner().await?;
        match self.identity.fetch_profile(&owner).await {
            Ok(profile) => Some(Identity {
                owner_id: owner,
                email: profile.email,
            }),
            Err(err) => {
                tracing::debug!(owner_id = %owner, error = %err, "identity lookup failed, building anonymous order");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::MockIdentityProvider;
    use shared::models::{CartItem, UserProfile};

    fn cart_with(name: &str, unit_price: i64, quantity: u32) -> Cart {
        Cart {
            items: vec![CartItem {
                id: "item-1".to_string(),
                name: name.to_string(),
                unit_price,
                quantity,
                notes: "extra pedas".to_string(),
                category: "Makanan".to_string(),
                image_ref: String::new(),
            }],
        }
    }

    fn builder(provider: MockIdentityProvider) -> OrderBuilder {
        OrderBuilder::new(Arc::new(provider), Config::default())
    }

    fn budi() -> CustomerDetails {
        CustomerDetails {
            name: "Budi".to_string(),
            table_number: "12".to_string(),
        }
    }

    #[tokio::test]
    async fn all_violations_are_accumulated() {
        let b = builder(MockIdentityProvider::anonymous());
        let err = b
            .create_order_data(
                CustomerDetails {
                    name: "  ".to_string(),
                    table_number: String::new(),
                },
                Cart::default(),
                Pricing::new(0, 0, None),
                None,
            )
            .await
            .unwrap_err();

        assert_eq!(err.violations.len(), 4);
        assert!(err.mentions("customer name"));
        assert!(err.mentions("table number"));
        assert!(err.mentions("cart"));
        assert!(err.mentions("total"));
    }

    #[tokio::test]
    async fn inconsistent_pricing_is_a_violation() {
        let b = builder(MockIdentityProvider::anonymous());
        let err = b
            .create_order_data(
                budi(),
                cart_with("Nasi Goreng", 25_000, 2),
                Pricing {
                    subtotal: 50_000,
                    discount: 10_000,
                    promo_code: None,
                    total: 50_000,
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(err.mentions("subtotal minus discount"));
    }

    #[tokio::test]
    async fn draft_shape_on_success() {
        let b = builder(MockIdentityProvider::anonymous());
        let order = b
            .create_order_data(
                budi(),
                cart_with("Nasi Goreng", 25_000, 2),
                Pricing::new(50_000, 0, None),
                None,
            )
            .await
            .unwrap();

        assert!(order.id.is_none());
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.status_timestamps, StatusTimestamps::default());
        assert_eq!(order.pricing.total, 50_000);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].subtotal, 50_000);
        assert_eq!(order.items[0].notes, "extra pedas");
        assert!(order.customer.identity.is_none());
        assert!(order.metadata.submitted_at > 0);

        // AMR + 13-digit millisecond timestamp
        assert!(order.order_number.starts_with("AMR"));
        assert_eq!(order.order_number.len(), "AMR".len() + 13);
        assert!(order.order_number["AMR".len()..].chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn signed_in_session_enriches_the_order() {
        let b = builder(MockIdentityProvider::signed_in(
            "uid-1",
            UserProfile {
                display_name: "Budi".to_string(),
                email: Some("budi@example.com".to_string()),
                profile_complete: true,
            },
        ));
        let order = b
            .create_order_data(
                budi(),
                cart_with("Nasi Goreng", 25_000, 1),
                Pricing::new(25_000, 0, None),
                None,
            )
            .await
            .unwrap();

        let identity = order.customer.identity.unwrap();
        assert_eq!(identity.owner_id, "uid-1");
        assert_eq!(identity.email.as_deref(), Some("budi@example.com"));
    }

    #[tokio::test]
    async fn failed_lookup_degrades_to_anonymous() {
        let provider = MockIdentityProvider {
            owner: Some("uid-1".to_string()),
            profile: None,
            fail_lookup: true,
        };
        let order = builder(provider)
            .create_order_data(
                budi(),
                cart_with("Nasi Goreng", 25_000, 1),
                Pricing::new(25_000, 0, None),
                None,
            )
            .await
            .unwrap();
        assert!(order.customer.identity.is_none());
    }

    #[tokio::test]
    async fn promo_code_is_recorded_normalized() {
        let b = builder(MockIdentityProvider::anonymous());
        let order = b
            .create_order_data(
                budi(),
                cart_with("Sate Ayam", 38_000, 3),
                Pricing::new(114_000, 20_000, None),
                Some("WEEKEND"),
            )
            .await
            .unwrap();
        assert_eq!(order.pricing.promo_code.as_deref(), Some("weekend"));
        assert_eq!(order.pricing.total, 94_000);
    }

    #[tokio::test]
    async fn drafts_carry_distinct_request_ids() {
        let b = builder(MockIdentityProvider::anonymous());
        let cart = cart_with("Nasi Goreng", 25_000, 1);
        let pricing = Pricing::new(25_000, 0, None);
        let a = b
            .create_order_data(budi(), cart.clone(), pricing.clone(), None)
            .await
            .unwrap();
        let c = b.create_order_data(budi(), cart, pricing, None).await.unwrap();
        assert_ne!(a.request_id, c.request_id);
    }
}
