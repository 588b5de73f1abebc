//! # Bill Repository
//!
//! Database operations for committed bills.
//!
//! ## Bill Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Bill Lifecycle                                    │
//! │                                                                         │
//! │  1. COMMIT                                                              │
//! │     └── insert() → bills + bill_items + bill_additional_costs           │
//! │         (one transaction; a bill is never half written)                 │
//! │                                                                         │
//! │  2. READ                                                                │
//! │     └── list() / get() → Bill with lines in entry order                 │
//! │                                                                         │
//! │  3. (OPTIONAL) OVERWRITE                                                │
//! │     └── update() → fields replaced verbatim, lines rewritten            │
//! │         (totals are whatever the caller stored, never re-derived)       │
//! │                                                                         │
//! │  4. (OPTIONAL) DELETE                                                   │
//! │     └── delete() → lines cascade                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bakehouse_core::{AdditionalCost, Bill, LineItem};

#[derive(Debug, sqlx::FromRow)]
struct BillRow {
    id: String,
    tenant_id: String,
    bill_number: String,
    customer_name: Option<String>,
    customer_phone: Option<String>,
    customer_address: Option<String>,
    subtotal_cents: i64,
    additional_costs_total_cents: i64,
    discount_bps: i64,
    discount_amount_cents: i64,
    total_cents: i64,
    profit_cents: i64,
    markup_bps: i64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    bill_id: String,
    product_id: String,
    product_name: String,
    quantity: i64,
    cost_price_cents: i64,
    selling_price_cents: i64,
    total_cents: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct CostRow {
    bill_id: String,
    id: String,
    description: String,
    amount_cents: i64,
}

impl From<ItemRow> for LineItem {
    fn from(row: ItemRow) -> Self {
        LineItem {
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            cost_price_cents: row.cost_price_cents,
            selling_price_cents: row.selling_price_cents,
            total_cents: row.total_cents,
        }
    }
}

impl From<CostRow> for AdditionalCost {
    fn from(row: CostRow) -> Self {
        AdditionalCost {
            id: row.id,
            description: row.description,
            amount_cents: row.amount_cents,
        }
    }
}

fn bps(column: &str, value: i64) -> DbResult<u32> {
    u32::try_from(value)
        .map_err(|_| DbError::QueryFailed(format!("{column} out of range: {value}")))
}

impl BillRow {
    fn into_bill(self, items: Vec<LineItem>, additional_costs: Vec<AdditionalCost>) -> DbResult<Bill> {
        Ok(Bill {
            discount_bps: bps("discount_bps", self.discount_bps)?,
            markup_bps: bps("markup_bps", self.markup_bps)?,
            id: self.id,
            tenant_id: self.tenant_id,
            bill_number: self.bill_number,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            customer_address: self.customer_address,
            items,
            additional_costs,
            subtotal_cents: self.subtotal_cents,
            additional_costs_total_cents: self.additional_costs_total_cents,
            discount_amount_cents: self.discount_amount_cents,
            total_cents: self.total_cents,
            profit_cents: self.profit_cents,
            created_at: self.created_at,
        })
    }
}

const SELECT_BILLS: &str = r#"
    SELECT id, tenant_id, bill_number, customer_name, customer_phone, customer_address,
           subtotal_cents, additional_costs_total_cents, discount_bps, discount_amount_cents,
           total_cents, profit_cents, markup_bps, created_at
    FROM bills
"#;

/// Repository for bill database operations.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    /// Creates a new BillRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository { pool }
    }

    /// Lists a tenant's bills in commit order (oldest first).
    pub async fn list(&self, tenant_id: &str) -> DbResult<Vec<Bill>> {
        let sql = format!("{SELECT_BILLS} WHERE tenant_id = ?1 ORDER BY created_at, bill_number");
        let rows: Vec<BillRow> = sqlx::query_as(&sql)
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await?;

        let items: Vec<ItemRow> = sqlx::query_as(
            r#"
            SELECT bi.bill_id, bi.product_id, bi.product_name, bi.quantity,
                   bi.cost_price_cents, bi.selling_price_cents, bi.total_cents
            FROM bill_items bi
            JOIN bills b ON b.id = bi.bill_id
            WHERE b.tenant_id = ?1
            ORDER BY bi.bill_id, bi.position
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        let costs: Vec<CostRow> = sqlx::query_as(
            r#"
            SELECT c.bill_id, c.id, c.description, c.amount_cents
            FROM bill_additional_costs c
            JOIN bills b ON b.id = c.bill_id
            WHERE b.tenant_id = ?1
            ORDER BY c.bill_id, c.position
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_bill: HashMap<String, Vec<LineItem>> = HashMap::new();
        for row in items {
            items_by_bill.entry(row.bill_id.clone()).or_default().push(row.into());
        }
        let mut costs_by_bill: HashMap<String, Vec<AdditionalCost>> = HashMap::new();
        for row in costs {
            costs_by_bill.entry(row.bill_id.clone()).or_default().push(row.into());
        }

        debug!(tenant_id = %tenant_id, count = rows.len(), "Listed bills");

        rows.into_iter()
            .map(|row| {
                let items = items_by_bill.remove(&row.id).unwrap_or_default();
                let costs = costs_by_bill.remove(&row.id).unwrap_or_default();
                row.into_bill(items, costs)
            })
            .collect()
    }

    /// Gets one bill with its lines.
    pub async fn get(&self, tenant_id: &str, id: &str) -> DbResult<Bill> {
        let sql = format!("{SELECT_BILLS} WHERE tenant_id = ?1 AND id = ?2");
        let row: Option<BillRow> = sqlx::query_as(&sql)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let row = row.ok_or_else(|| DbError::not_found("Bill", id))?;

        let items: Vec<ItemRow> = sqlx::query_as(
            r#"
            SELECT bill_id, product_id, product_name, quantity,
                   cost_price_cents, selling_price_cents, total_cents
            FROM bill_items
            WHERE bill_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let costs: Vec<CostRow> = sqlx::query_as(
            r#"
            SELECT bill_id, id, description, amount_cents
            FROM bill_additional_costs
            WHERE bill_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        row.into_bill(
            items.into_iter().map(LineItem::from).collect(),
            costs.into_iter().map(AdditionalCost::from).collect(),
        )
    }

    /// Writes a committed bill with all of its lines atomically.
    ///
    /// ## Errors
    /// [`DbError::UniqueViolation`] when the tenant already has a bill with
    /// the same number.
    pub async fn insert(&self, bill: &Bill) -> DbResult<()> {
        debug!(id = %bill.id, bill_number = %bill.bill_number, "Inserting bill");

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        sqlx::query(
            r#"
            INSERT INTO bills (
                id, tenant_id, bill_number,
                customer_name, customer_phone, customer_address,
                subtotal_cents, additional_costs_total_cents,
                discount_bps, discount_amount_cents,
                total_cents, profit_cents, markup_bps, created_at
            ) VALUES (
                ?1, ?2, ?3,
                ?4, ?5, ?6,
                ?7, ?8,
                ?9, ?10,
                ?11, ?12, ?13, ?14
            )
            "#,
        )
        .bind(&bill.id)
        .bind(&bill.tenant_id)
        .bind(&bill.bill_number)
        .bind(&bill.customer_name)
        .bind(&bill.customer_phone)
        .bind(&bill.customer_address)
        .bind(bill.subtotal_cents)
        .bind(bill.additional_costs_total_cents)
        .bind(i64::from(bill.discount_bps))
        .bind(bill.discount_amount_cents)
        .bind(bill.total_cents)
        .bind(bill.profit_cents)
        .bind(i64::from(bill.markup_bps))
        .bind(bill.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => {
                DbError::duplicate("bill_number", bill.bill_number.clone())
            }
            other => other,
        })?;

        insert_lines(&mut tx, bill).await?;

        tx.commit().await.map_err(DbError::transaction)?;
        Ok(())
    }

    /// Replaces every stored field of a bill with the given values.
    ///
    /// Lines are rewritten wholesale. Id, number, tenant and creation time
    /// are never changed.
    pub async fn update(&self, bill: &Bill) -> DbResult<()> {
        debug!(id = %bill.id, "Overwriting bill");

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let result = sqlx::query(
            r#"
            UPDATE bills SET
                customer_name = ?3,
                customer_phone = ?4,
                customer_address = ?5,
                subtotal_cents = ?6,
                additional_costs_total_cents = ?7,
                discount_bps = ?8,
                discount_amount_cents = ?9,
                total_cents = ?10,
                profit_cents = ?11,
                markup_bps = ?12
            WHERE tenant_id = ?1 AND id = ?2
            "#,
        )
        .bind(&bill.tenant_id)
        .bind(&bill.id)
        .bind(&bill.customer_name)
        .bind(&bill.customer_phone)
        .bind(&bill.customer_address)
        .bind(bill.subtotal_cents)
        .bind(bill.additional_costs_total_cents)
        .bind(i64::from(bill.discount_bps))
        .bind(bill.discount_amount_cents)
        .bind(bill.total_cents)
        .bind(bill.profit_cents)
        .bind(i64::from(bill.markup_bps))
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Bill", &bill.id));
        }

        sqlx::query("DELETE FROM bill_items WHERE bill_id = ?1")
            .bind(&bill.id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM bill_additional_costs WHERE bill_id = ?1")
            .bind(&bill.id)
            .execute(&mut *tx)
            .await?;

        insert_lines(&mut tx, bill).await?;

        tx.commit().await.map_err(DbError::transaction)?;
        Ok(())
    }

    /// Deletes a bill; its lines go with it.
    pub async fn delete(&self, tenant_id: &str, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting bill");

        let result = sqlx::query("DELETE FROM bills WHERE tenant_id = ?1 AND id = ?2")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Bill", id));
        }

        Ok(())
    }
}

async fn insert_lines(tx: &mut Transaction<'_, Sqlite>, bill: &Bill) -> DbResult<()> {
    for (position, item) in bill.items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO bill_items (
                bill_id, position, product_id, product_name, quantity,
                cost_price_cents, selling_price_cents, total_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&bill.id)
        .bind(position as i64)
        .bind(&item.product_id)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(item.cost_price_cents)
        .bind(item.selling_price_cents)
        .bind(item.total_cents)
        .execute(&mut **tx)
        .await?;
    }

    for (position, cost) in bill.additional_costs.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO bill_additional_costs (
                bill_id, position, id, description, amount_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&bill.id)
        .bind(position as i64)
        .bind(&cost.id)
        .bind(&cost.description)
        .bind(cost.amount_cents)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use bakehouse_core::billing::BillOverwrite;
    use bakehouse_core::{AdditionalCostUpdate, BillDraft, CatalogProduct, Money, Percentage};
    use chrono::Duration;

    fn catalog() -> Vec<CatalogProduct> {
        vec![
            CatalogProduct {
                id: "cake".to_string(),
                name: "Cake".to_string(),
                cost_basis_cents: 10000,
                weight_grams: 1000.0,
            },
            CatalogProduct {
                id: "cookie".to_string(),
                name: "Cookie".to_string(),
                cost_basis_cents: 500,
                weight_grams: 50.0,
            },
        ]
    }

    fn draft() -> BillDraft {
        let catalog = catalog();
        let mut draft = BillDraft::new(Percentage::from_percent(50));
        draft.add_item("cake", &catalog).unwrap();
        draft.add_item("cake", &catalog).unwrap();
        draft.add_item("cookie", &catalog).unwrap();
        let cost_id = draft.add_additional_cost();
        draft
            .update_additional_cost(&cost_id, AdditionalCostUpdate::Description("Delivery".to_string()))
            .unwrap();
        draft
            .update_additional_cost(&cost_id, AdditionalCostUpdate::Amount(Money::from_cents(2000)))
            .unwrap();
        draft.set_discount(Percentage::from_percent(10)).unwrap();
        draft
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let bill = draft().finalize("t1", Utc::now()).unwrap();

        db.bills().insert(&bill).await.unwrap();
        let stored = db.bills().get("t1", &bill.id).await.unwrap();

        assert_eq!(stored.bill_number, bill.bill_number);
        assert_eq!(stored.items, bill.items);
        assert_eq!(stored.additional_costs, bill.additional_costs);
        assert_eq!(stored.total_cents, bill.total_cents);
        assert_eq!(stored.profit_cents, bill.profit_cents);
        assert_eq!(stored.discount_bps, 1000);
        assert_eq!(stored.markup_bps, 5000);
    }

    #[tokio::test]
    async fn test_list_is_tenant_scoped_and_ordered() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let first = draft().finalize("t1", now).unwrap();
        let second = draft().finalize("t1", now + Duration::seconds(5)).unwrap();
        let foreign = draft().finalize("t2", now).unwrap();

        db.bills().insert(&second).await.unwrap();
        db.bills().insert(&first).await.unwrap();
        db.bills().insert(&foreign).await.unwrap();

        let bills = db.bills().list("t1").await.unwrap();
        assert_eq!(bills.len(), 2);
        assert_eq!(bills[0].id, first.id);
        assert_eq!(bills[1].id, second.id);
        assert_eq!(bills[0].items.len(), 2);
        assert_eq!(bills[0].additional_costs.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_bill_number_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let first = draft().finalize("t1", now).unwrap();
        let clash = draft().finalize("t1", now).unwrap();

        db.bills().insert(&first).await.unwrap();
        let err = db.bills().insert(&clash).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if *value == first.bill_number));

        // The failed insert left no orphaned lines behind.
        let lines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bill_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(lines, 2);
    }

    #[tokio::test]
    async fn test_overwrite_keeps_supplied_totals() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut bill = draft().finalize("t1", Utc::now()).unwrap();
        db.bills().insert(&bill).await.unwrap();

        bill.overwrite(BillOverwrite {
            customer_name: Some(Some("Asha".to_string())),
            items: Some(Vec::new()),
            total_cents: Some(1),
            ..Default::default()
        });
        db.bills().update(&bill).await.unwrap();

        let stored = db.bills().get("t1", &bill.id).await.unwrap();
        assert_eq!(stored.customer_name.as_deref(), Some("Asha"));
        assert!(stored.items.is_empty());
        assert_eq!(stored.total_cents, 1);
        assert_eq!(stored.additional_costs.len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let bill = draft().finalize("t1", Utc::now()).unwrap();
        db.bills().insert(&bill).await.unwrap();

        assert!(matches!(
            db.bills().delete("t2", &bill.id).await,
            Err(DbError::NotFound { .. })
        ));
        db.bills().delete("t1", &bill.id).await.unwrap();
        assert!(db.bills().list("t1").await.unwrap().is_empty());
    }
}
