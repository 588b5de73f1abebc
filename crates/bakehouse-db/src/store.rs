//! # Store Traits
//!
//! The narrow data-access seams the billing flow depends on.
//!
//! ```text
//! services::billing::commit ──► BillStore      ──┐
//! draft handlers            ──► ProductCatalog ──┼──► Database (SQLite)
//! ```
//!
//! [`Database`] is the only production implementation; tests substitute
//! in-memory fakes to observe what the billing flow writes.

use std::future::Future;

use bakehouse_core::{Bill, CatalogProduct};

use crate::error::DbResult;
use crate::pool::Database;

/// Source of the products a tenant can bill.
pub trait ProductCatalog {
    /// Catalog projection of every product of the tenant.
    fn list_products(
        &self,
        tenant_id: &str,
    ) -> impl Future<Output = DbResult<Vec<CatalogProduct>>> + Send;
}

/// Durable storage of committed bills.
pub trait BillStore {
    /// Persists a committed bill and returns the stored record.
    fn create_bill(
        &self,
        tenant_id: &str,
        bill: Bill,
    ) -> impl Future<Output = DbResult<Bill>> + Send;

    /// Every bill of the tenant, oldest first.
    fn list_bills(&self, tenant_id: &str) -> impl Future<Output = DbResult<Vec<Bill>>> + Send;

    /// Removes one bill of the tenant.
    fn delete_bill(&self, tenant_id: &str, id: &str) -> impl Future<Output = DbResult<()>> + Send;
}

impl ProductCatalog for Database {
    async fn list_products(&self, tenant_id: &str) -> DbResult<Vec<CatalogProduct>> {
        self.products().catalog(tenant_id).await
    }
}

impl BillStore for Database {
    async fn create_bill(&self, tenant_id: &str, mut bill: Bill) -> DbResult<Bill> {
        // The session decides ownership, never the payload.
        bill.tenant_id = tenant_id.to_string();
        self.bills().insert(&bill).await?;
        Ok(bill)
    }

    async fn list_bills(&self, tenant_id: &str) -> DbResult<Vec<Bill>> {
        self.bills().list(tenant_id).await
    }

    async fn delete_bill(&self, tenant_id: &str, id: &str) -> DbResult<()> {
        self.bills().delete(tenant_id, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use bakehouse_core::{BillDraft, Percentage};
    use chrono::Utc;

    #[tokio::test]
    async fn test_create_bill_takes_tenant_from_caller() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = vec![CatalogProduct {
            id: "bun".to_string(),
            name: "Bun".to_string(),
            cost_basis_cents: 1000,
            weight_grams: 80.0,
        }];
        let mut draft = BillDraft::new(Percentage::from_percent(50));
        draft.add_item("bun", &catalog).unwrap();
        let bill = draft.finalize("someone-else", Utc::now()).unwrap();

        let stored = db.create_bill("t1", bill).await.unwrap();
        assert_eq!(stored.tenant_id, "t1");
        assert_eq!(db.list_bills("t1").await.unwrap().len(), 1);
        assert!(db.list_bills("someone-else").await.unwrap().is_empty());

        db.delete_bill("t1", &stored.id).await.unwrap();
        assert!(db.list_bills("t1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.list_products("t1").await.unwrap().is_empty());
    }
}
