//! # Dashboard Report
//!
//! Business overview computed from a tenant's inventory, products and bills.
//!
//! ```text
//! inventory ──► item count, stock value (Σ total_cost), low-stock items
//! products  ──► product count
//! bills     ──► revenue (Σ total), profit (Σ profit), margin %, recent 5
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::billing::Bill;
use crate::money::Money;
use crate::types::{InventoryItem, Product, Unit};

/// How many bills the "recent" list shows.
pub const RECENT_BILLS: usize = 5;

/// A committed bill reduced to what the dashboard lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecentBill {
    pub id: String,
    pub bill_number: String,
    pub customer_name: Option<String>,
    pub total: Money,
    pub profit: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl From<&Bill> for RecentBill {
    fn from(bill: &Bill) -> Self {
        RecentBill {
            id: bill.id.clone(),
            bill_number: bill.bill_number.clone(),
            customer_name: bill.customer_name.clone(),
            total: bill.total(),
            profit: bill.profit(),
            created_at: bill.created_at,
        }
    }
}

/// An inventory item that is running low.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LowStockItem {
    pub id: String,
    pub name: String,
    pub total_quantity: f64,
    pub unit: Unit,
    pub cost_per_unit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    pub inventory_count: usize,
    pub inventory_value: Money,
    pub product_count: usize,
    pub bill_count: usize,
    pub revenue: Money,
    pub profit: Money,
    /// profit / revenue × 100, one decimal. Zero without revenue.
    pub margin_percent: f64,
    /// Newest first.
    pub recent_bills: Vec<RecentBill>,
    pub low_stock: Vec<LowStockItem>,
}

impl DashboardSummary {
    pub fn compute(inventory: &[InventoryItem], products: &[Product], bills: &[Bill]) -> Self {
        let revenue: Money = bills.iter().map(Bill::total).sum();
        let profit: Money = bills.iter().map(Bill::profit).sum();

        let margin_percent = if revenue.is_positive() {
            let raw = profit.cents() as f64 / revenue.cents() as f64 * 100.0;
            (raw * 10.0).round() / 10.0
        } else {
            0.0
        };

        let mut recent: Vec<&Bill> = bills.iter().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        DashboardSummary {
            inventory_count: inventory.len(),
            inventory_value: inventory.iter().map(InventoryItem::total_cost).sum(),
            product_count: products.len(),
            bill_count: bills.len(),
            revenue,
            profit,
            margin_percent,
            recent_bills: recent
                .into_iter()
                .take(RECENT_BILLS)
                .map(RecentBill::from)
                .collect(),
            low_stock: inventory
                .iter()
                .filter(|item| item.is_low_stock())
                .map(|item| LowStockItem {
                    id: item.id.clone(),
                    name: item.name.clone(),
                    total_quantity: item.total_quantity,
                    unit: item.unit,
                    cost_per_unit: item.cost_per_unit,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::BillDraft;
    use crate::types::{CatalogProduct, Percentage};
    use chrono::{Duration, TimeZone};

    fn bills(count: usize) -> Vec<Bill> {
        let catalog = vec![CatalogProduct {
            id: "cake".to_string(),
            name: "Cake".to_string(),
            cost_basis_cents: 10000,
            weight_grams: 500.0,
        }];
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();

        (0..count)
            .map(|i| {
                let mut draft = BillDraft::new(Percentage::from_percent(50));
                draft.add_item("cake", &catalog).unwrap();
                draft
                    .finalize("t1", start + Duration::hours(i as i64))
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_empty_dashboard() {
        let summary = DashboardSummary::compute(&[], &[], &[]);
        assert_eq!(summary.revenue, Money::zero());
        assert_eq!(summary.margin_percent, 0.0);
        assert!(summary.recent_bills.is_empty());
        assert!(summary.low_stock.is_empty());
    }

    #[test]
    fn test_revenue_profit_and_margin() {
        let bills = bills(3);
        let summary = DashboardSummary::compute(&[], &[], &bills);

        assert_eq!(summary.bill_count, 3);
        assert_eq!(summary.revenue.cents(), 45000);
        assert_eq!(summary.profit.cents(), 15000);
        assert!((summary.margin_percent - 33.3).abs() < 1e-9);
    }

    #[test]
    fn test_recent_bills_newest_first() {
        let mut bills = bills(7);
        bills.reverse();
        bills.swap(0, 3);

        let summary = DashboardSummary::compute(&[], &[], &bills);
        let times: Vec<_> = summary.recent_bills.iter().map(|b| b.created_at).collect();

        assert_eq!(times.len(), 5);
        assert!(times.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(times[0], bills.iter().map(|b| b.created_at).max().unwrap());
    }

    #[test]
    fn test_inventory_value_and_low_stock() {
        let now = Utc::now();
        let inventory = vec![
            InventoryItem::new("t1", "Flour", 5000.0, Unit::Grams, Money::from_cents(22500), now),
            InventoryItem::new("t1", "Eggs", 3.0, Unit::Pieces, Money::from_cents(1800), now),
        ];

        let summary = DashboardSummary::compute(&inventory, &[], &[]);

        assert_eq!(summary.inventory_count, 2);
        assert_eq!(summary.inventory_value.cents(), 24300);
        assert_eq!(summary.low_stock.len(), 1);
        assert_eq!(summary.low_stock[0].name, "Eggs");
    }
}
