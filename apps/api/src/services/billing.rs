//! # Bill Commit
//!
//! Turns a draft into a stored bill.
//!
//! ```text
//! BillDraft ──► finalize(tenant, now) ──► Bill ──► BillStore::create_bill ──► Bill
//!                     │                                    │
//!                     └─ empty: ValidationError            └─ DbError
//!                        (store never called)                 (propagated)
//! ```
//!
//! The draft is borrowed, never consumed: on any failure the caller still
//! holds it unchanged.

use chrono::Utc;
use tracing::info;

use bakehouse_core::{Bill, BillDraft};
use bakehouse_db::BillStore;

use crate::error::ApiResult;

/// Finalizes `draft` for `tenant_id` and persists the result.
pub async fn commit<S>(store: &S, tenant_id: &str, draft: &BillDraft) -> ApiResult<Bill>
where
    S: BillStore + Sync,
{
    let bill = draft.finalize(tenant_id, Utc::now())?;
    let bill = store.create_bill(tenant_id, bill).await?;

    info!(
        tenant_id = %tenant_id,
        bill_number = %bill.bill_number,
        total = %bill.total(),
        profit = %bill.profit(),
        "Bill committed"
    );

    Ok(bill)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use bakehouse_core::{CatalogProduct, Percentage};
    use bakehouse_db::{DbError, DbResult};
    use std::sync::Mutex;

    /// Records every bill it is asked to store.
    #[derive(Default)]
    struct RecordingStore {
        created: Mutex<Vec<Bill>>,
        fail: bool,
    }

    impl BillStore for RecordingStore {
        async fn create_bill(&self, _tenant_id: &str, bill: Bill) -> DbResult<Bill> {
            if self.fail {
                return Err(DbError::TransactionFailed("disk full".to_string()));
            }
            self.created.lock().unwrap().push(bill.clone());
            Ok(bill)
        }

        async fn list_bills(&self, _tenant_id: &str) -> DbResult<Vec<Bill>> {
            Ok(self.created.lock().unwrap().clone())
        }

        async fn delete_bill(&self, _tenant_id: &str, _id: &str) -> DbResult<()> {
            Ok(())
        }
    }

    fn one_cake() -> BillDraft {
        let catalog = vec![CatalogProduct {
            id: "cake".to_string(),
            name: "Cake".to_string(),
            cost_basis_cents: 10000,
            weight_grams: 1000.0,
        }];
        let mut draft = BillDraft::new(Percentage::from_percent(50));
        draft.add_item("cake", &catalog).unwrap();
        draft
    }

    #[tokio::test]
    async fn test_empty_draft_never_reaches_store() {
        let store = RecordingStore::default();

        let err = commit(&store, "t1", &BillDraft::default()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(store.list_bills("t1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_stores_finalized_bill() {
        let store = RecordingStore::default();
        let draft = one_cake();

        let bill = commit(&store, "t1", &draft).await.unwrap();

        assert_eq!(bill.tenant_id, "t1");
        assert_eq!(bill.total_cents, 15000);
        assert_eq!(bill.profit_cents, 5000);
        assert!(bill.bill_number.starts_with("BILL-"));
        assert_eq!(store.list_bills("t1").await.unwrap(), vec![bill]);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = RecordingStore {
            fail: true,
            ..Default::default()
        };
        let draft = one_cake();

        let err = commit(&store, "t1", &draft).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
        // The caller's draft is still intact for a retry.
        assert_eq!(draft.items().len(), 1);
    }
}
