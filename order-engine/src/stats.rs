//! StatisticsAggregator - dashboard rollups over the order collection
//!
//! Works on a full-collection read and filters client-side, so cost
//! grows with total historical orders, not with the window size. Every
//! order in the window contributes to every rollup; status only affects
//! the breakdown counts.

use crate::db::repository::{OrderRepository, RepoResult};
use chrono::{DateTime, Datelike, Duration, Local, TimeZone};
use shared::models::Order;
use shared::types::{Money, Timestamp};
use std::collections::{BTreeMap, HashMap};

/// Reporting window, anchored to the store's local clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Range {
    Today,
    Week,
    Month,
    All,
}

impl Range {
    /// Inclusive lower bound of the window in Unix milliseconds.
    ///
    /// `Today` starts at local midnight, `Week` is a rolling seven days,
    /// `Month` starts on the first of the current calendar month.
    pub fn start_millis(&self, now: DateTime<Local>) -> Timestamp {
        match self {
            Range::Today => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .and_then(|dt| Local.from_local_datetime(&dt).single())
                .map(|dt| dt.timestamp_millis())
                .unwrap_or(0),
            Range::Week => (now - Duration::days(7)).timestamp_millis(),
            Range::Month => now
                .date_naive()
                .with_day(1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .and_then(|dt| Local.from_local_datetime(&dt).single())
                .map(|dt| dt.timestamp_millis())
                .unwrap_or(0),
            Range::All => 0,
        }
    }
}

/// One row of the popular-items table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopularItem {
    pub name: String,
    pub quantity: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub total_orders: u64,
    /// Sum of `pricing.total` over the window
    pub total_revenue: Money,
    pub status_breakdown: BTreeMap<String, u64>,
    /// Top ten by quantity sold, descending; ties break by name
    pub popular_items: Vec<PopularItem>,
}

pub struct StatisticsAggregator {
    repo: OrderRepository,
}

impl StatisticsAggregator {
    pub fn new(repo: OrderRepository) -> Self {
        Self { repo }
    }

    pub async fn aggregate(&self, range: Range) -> RepoResult<Statistics> {
        let orders = self.repo.find_all().await?;
        let start = range.start_millis(Local::now());
        Ok(compute(&orders, start))
    }
}

/// Pure rollup over an already-fetched slice, windowed by submission time.
pub fn compute(orders: &[Order], start_millis: Timestamp) -> Statistics {
    let mut stats = Statistics::default();
    let mut item_counts: HashMap<String, u64> = HashMap::new();

    for order in orders {
        if order.metadata.submitted_at < start_millis {
            continue;
        }
        stats.total_orders += 1;
        *stats
            .status_breakdown
            .entry(order.status.as_str().to_string())
            .or_insert(0) += 1;

        stats.total_revenue += order.pricing.total;
        for item in &order.items {
            *item_counts.entry(item.name.clone()).or_insert(0) += u64::from(item.quantity);
        }
    }

    let mut popular: Vec<PopularItem> = item_counts
        .into_iter()
        .map(|(name, quantity)| PopularItem { name, quantity })
        .collect();
    popular.sort_by(|a, b| b.quantity.cmp(&a.quantity).then(a.name.cmp(&b.name)));
    popular.truncate(10);
    stats.popular_items = popular;

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{
        CustomerInfo, OrderItem, OrderMetadata, OrderStatus, Pricing, StatusTimestamps,
    };
    use shared::util::now_millis;

    fn order(submitted_at: Timestamp, status: OrderStatus, items: &[(&str, u32, Money)]) -> Order {
        let items: Vec<OrderItem> = items
            .iter()
            .map(|(name, qty, price)| OrderItem {
                name: name.to_string(),
                unit_price: *price,
                quantity: *qty,
                subtotal: *price * Money::from(*qty),
                notes: String::new(),
                category: "Makanan".to_string(),
                image_ref: String::new(),
            })
            .collect();
        let subtotal: Money = items.iter().map(|i| i.subtotal).sum();
        Order {
            id: Some("order:test".to_string()),
            order_number: "AMR0000000000000".to_string(),
            request_id: "rid".to_string(),
            customer: CustomerInfo {
                name: "Budi".to_string(),
                table_number: "1".to_string(),
                identity: None,
            },
            items,
            pricing: Pricing::new(subtotal, 0, None),
            status,
            status_timestamps: StatusTimestamps::default(),
            metadata: OrderMetadata {
                source: "web".to_string(),
                submitted_at,
                locale: "id-ID".to_string(),
            },
        }
    }

    #[test]
    fn window_excludes_older_orders() {
        let now = now_millis();
        let orders = vec![
            order(now, OrderStatus::Completed, &[("Sate", 1, 30_000)]),
            order(now - 1_000_000, OrderStatus::Completed, &[("Sate", 5, 30_000)]),
        ];
        let stats = compute(&orders, now - 10_000);
        assert_eq!(stats.total_orders, 1);
        assert_eq!(stats.total_revenue, 30_000);
        assert_eq!(stats.popular_items[0].quantity, 1);
    }

    #[test]
    fn every_status_contributes_to_revenue_and_popularity() {
        let now = now_millis();
        let orders = vec![
            order(now, OrderStatus::Completed, &[("Sate", 1, 30_000)]),
            order(now, OrderStatus::Cancelled, &[("Bakso", 1, 20_000)]),
        ];
        let stats = compute(&orders, 0);
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.total_revenue, 50_000);
        assert_eq!(stats.status_breakdown["cancelled"], 1);
        assert_eq!(stats.status_breakdown["completed"], 1);
        let names: Vec<&str> = stats.popular_items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Bakso", "Sate"]);
    }

    #[test]
    fn popular_items_top_ten_with_name_tiebreak() {
        let now = now_millis();
        let mut lines: Vec<(String, u32, Money)> = (0..12)
            .map(|i| (format!("Item {i:02}"), (i + 1) as u32, 10_000))
            .collect();
        // two items tied at the same quantity
        lines.push(("Zebra".to_string(), 12, 10_000));
        let borrowed: Vec<(&str, u32, Money)> = lines
            .iter()
            .map(|(n, q, p)| (n.as_str(), *q, *p))
            .collect();
        let orders = vec![order(now, OrderStatus::Completed, &borrowed)];

        let stats = compute(&orders, 0);
        assert_eq!(stats.popular_items.len(), 10);
        // Item 11 and Zebra both sold 12; name order decides
        assert_eq!(stats.popular_items[0].name, "Item 11");
        assert_eq!(stats.popular_items[1].name, "Zebra");
        assert_eq!(stats.popular_items[0].quantity, 12);
    }

    #[test]
    fn range_bounds_are_ordered() {
        let now = Local::now();
        let today = Range::Today.start_millis(now);
        let week = Range::Week.start_millis(now);
        let all = Range::All.start_millis(now);
        assert!(today <= now.timestamp_millis());
        assert!(week < today || now.timestamp_millis() - week >= 6 * 86_400_000);
        assert_eq!(all, 0);
        assert!(Range::Month.start_millis(now) <= today);
    }
}
