//! # Inventory Repository
//!
//! Database operations for raw materials.
//!
//! Every statement filters on `tenant_id`: an item that belongs to another
//! tenant is reported as not found, exactly like an id that never existed.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bakehouse_core::{InventoryItem, Unit};

/// Row shape of `inventory_items`.
#[derive(Debug, sqlx::FromRow)]
struct InventoryRow {
    id: String,
    tenant_id: String,
    name: String,
    total_quantity: f64,
    unit: Unit,
    total_cost_cents: i64,
    cost_per_unit: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<InventoryRow> for InventoryItem {
    fn from(row: InventoryRow) -> Self {
        InventoryItem {
            id: row.id,
            tenant_id: row.tenant_id,
            name: row.name,
            total_quantity: row.total_quantity,
            unit: row.unit,
            total_cost_cents: row.total_cost_cents,
            cost_per_unit: row.cost_per_unit,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, tenant_id, name, total_quantity, unit,
           total_cost_cents, cost_per_unit, created_at, updated_at
    FROM inventory_items
"#;

/// Repository for inventory database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.inventory();
/// let items = repo.list(&tenant_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Lists a tenant's items, oldest first.
    pub async fn list(&self, tenant_id: &str) -> DbResult<Vec<InventoryItem>> {
        let sql = format!("{SELECT_COLUMNS} WHERE tenant_id = ?1 ORDER BY created_at, id");

        let rows: Vec<InventoryRow> = sqlx::query_as(&sql)
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(tenant_id = %tenant_id, count = rows.len(), "Listed inventory");
        Ok(rows.into_iter().map(InventoryItem::from).collect())
    }

    /// Gets one item.
    ///
    /// ## Errors
    /// [`DbError::NotFound`] when the tenant has no item with this id.
    pub async fn get(&self, tenant_id: &str, id: &str) -> DbResult<InventoryItem> {
        let sql = format!("{SELECT_COLUMNS} WHERE tenant_id = ?1 AND id = ?2");

        let row: Option<InventoryRow> = sqlx::query_as(&sql)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(InventoryItem::from)
            .ok_or_else(|| DbError::not_found("Inventory item", id))
    }

    /// Inserts a new item.
    pub async fn insert(&self, item: &InventoryItem) -> DbResult<()> {
        debug!(id = %item.id, name = %item.name, "Inserting inventory item");

        sqlx::query(
            r#"
            INSERT INTO inventory_items (
                id, tenant_id, name, total_quantity, unit,
                total_cost_cents, cost_per_unit, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&item.id)
        .bind(&item.tenant_id)
        .bind(&item.name)
        .bind(item.total_quantity)
        .bind(item.unit)
        .bind(item.total_cost_cents)
        .bind(item.cost_per_unit)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Writes back the editable fields of an existing item.
    ///
    /// ## Errors
    /// [`DbError::NotFound`] when no row of this tenant has the item's id.
    pub async fn update(&self, item: &InventoryItem) -> DbResult<()> {
        debug!(id = %item.id, "Updating inventory item");

        let result = sqlx::query(
            r#"
            UPDATE inventory_items SET
                name = ?3,
                total_quantity = ?4,
                unit = ?5,
                total_cost_cents = ?6,
                cost_per_unit = ?7,
                updated_at = ?8
            WHERE tenant_id = ?1 AND id = ?2
            "#,
        )
        .bind(&item.tenant_id)
        .bind(&item.id)
        .bind(&item.name)
        .bind(item.total_quantity)
        .bind(item.unit)
        .bind(item.total_cost_cents)
        .bind(item.cost_per_unit)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", &item.id));
        }

        Ok(())
    }

    /// Deletes an item. Recipes that used it keep their snapshot.
    pub async fn delete(&self, tenant_id: &str, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting inventory item");

        let result = sqlx::query("DELETE FROM inventory_items WHERE tenant_id = ?1 AND id = ?2")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use bakehouse_core::Money;
    use chrono::Duration;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = setup().await;
        let now = Utc::now();
        let flour = InventoryItem::new("t1", "Flour", 1000.0, Unit::Grams, Money::from_cents(4500), now);
        let eggs = InventoryItem::new(
            "t1",
            "Eggs",
            12.0,
            Unit::Pieces,
            Money::from_cents(7200),
            now + Duration::seconds(1),
        );

        db.inventory().insert(&flour).await.unwrap();
        db.inventory().insert(&eggs).await.unwrap();

        let items = db.inventory().list("t1").await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Flour");
        assert_eq!(items[1].unit, Unit::Pieces);
        assert!((items[0].cost_per_unit - 4.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_tenant_isolation() {
        let db = setup().await;
        let item = InventoryItem::new("t1", "Butter", 500.0, Unit::Grams, Money::from_cents(25000), Utc::now());
        db.inventory().insert(&item).await.unwrap();

        assert!(db.inventory().list("t2").await.unwrap().is_empty());
        assert!(matches!(
            db.inventory().get("t2", &item.id).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            db.inventory().delete("t2", &item.id).await,
            Err(DbError::NotFound { .. })
        ));
        assert_eq!(db.inventory().list("t1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update() {
        let db = setup().await;
        let now = Utc::now();
        let mut item = InventoryItem::new("t1", "Milk", 1.0, Unit::Liters, Money::from_cents(6000), now);
        db.inventory().insert(&item).await.unwrap();

        item.apply_update("Whole milk", 2.0, Unit::Liters, Money::from_cents(11000), now);
        db.inventory().update(&item).await.unwrap();

        let stored = db.inventory().get("t1", &item.id).await.unwrap();
        assert_eq!(stored.name, "Whole milk");
        assert_eq!(stored.total_cost_cents, 11000);
        assert!((stored.cost_per_unit - 5500.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = setup().await;
        let item = InventoryItem::new("t1", "Ghost", 1.0, Unit::Cups, Money::from_cents(100), Utc::now());

        assert!(matches!(
            db.inventory().update(&item).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = setup().await;
        let item = InventoryItem::new("t1", "Salt", 1000.0, Unit::Grams, Money::from_cents(2000), Utc::now());
        db.inventory().insert(&item).await.unwrap();

        db.inventory().delete("t1", &item.id).await.unwrap();
        assert!(db.inventory().list("t1").await.unwrap().is_empty());
    }
}
