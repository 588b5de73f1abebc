//! # Draft State
//!
//! Holds the in-progress bill of every tenant.
//!
//! ## Thread Safety
//! The map is wrapped in `Arc<Mutex<T>>` because:
//! 1. Requests for the same tenant can arrive concurrently
//! 2. Only one request should modify a draft at a time
//! 3. Every mutation is synchronous, so the lock is never held across `.await`
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft State Operations                               │
//! │                                                                         │
//! │  Request                      DraftState              Draft Change      │
//! │  ───────                      ──────────              ────────────      │
//! │                                                                         │
//! │  POST /api/draft/items ──────► with_draft() ────────► add_item()        │
//! │  PUT  /api/draft/markup ─────► with_draft() ────────► set_markup()      │
//! │  GET  /api/draft ────────────► snapshot() ──────────► (read only)       │
//! │                                                                         │
//! │  POST /api/draft/commit:                                                │
//! │     begin_commit() ─► snapshot() ─► persist.await ─► reset()            │
//! │          │                              │                               │
//! │          └─ already committing: 409     └─ failure: draft untouched     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use bakehouse_core::{BillDraft, Percentage};

/// Per-tenant draft bills.
#[derive(Debug, Clone)]
pub struct DraftState {
    drafts: Arc<Mutex<HashMap<String, BillDraft>>>,
    /// Tenants with a commit in flight.
    committing: Arc<Mutex<HashSet<String>>>,
    default_markup: Percentage,
}

/// Held while a tenant's draft is being committed. Dropping it, on success,
/// failure or a cancelled request, lets the next commit through.
#[derive(Debug)]
pub struct CommitGuard {
    committing: Arc<Mutex<HashSet<String>>>,
    tenant_id: String,
}

impl Drop for CommitGuard {
    fn drop(&mut self) {
        self.committing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.tenant_id);
    }
}

impl DraftState {
    /// Creates an empty state; new drafts start at `default_markup`.
    pub fn new(default_markup: Percentage) -> Self {
        DraftState {
            drafts: Arc::new(Mutex::new(HashMap::new())),
            committing: Arc::new(Mutex::new(HashSet::new())),
            default_markup,
        }
    }

    /// Runs `f` with write access to the tenant's draft, creating it if needed.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let added = drafts.with_draft(&tenant.tenant_id, |d| d.add_item(&id, &catalog));
    /// ```
    pub fn with_draft<F, R>(&self, tenant_id: &str, f: F) -> R
    where
        F: FnOnce(&mut BillDraft) -> R,
    {
        // Draft edits run on a copy that is swapped in last, so a panic in
        // `f` leaves the previous draft in place and the map stays usable.
        let mut drafts = self.drafts.lock().unwrap_or_else(PoisonError::into_inner);
        let draft = drafts
            .entry(tenant_id.to_string())
            .or_insert_with(|| BillDraft::new(self.default_markup));
        f(draft)
    }

    /// Copy of the tenant's current draft.
    pub fn snapshot(&self, tenant_id: &str) -> BillDraft {
        self.with_draft(tenant_id, |draft| draft.clone())
    }

    /// Claims the tenant's draft for a commit.
    ///
    /// Returns `None` while another commit of the same tenant is in flight,
    /// so one draft is never stored as two bills.
    pub fn begin_commit(&self, tenant_id: &str) -> Option<CommitGuard> {
        let mut committing = self
            .committing
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !committing.insert(tenant_id.to_string()) {
            return None;
        }
        Some(CommitGuard {
            committing: Arc::clone(&self.committing),
            tenant_id: tenant_id.to_string(),
        })
    }

    /// Discards the tenant's draft and returns the fresh one.
    pub fn reset(&self, tenant_id: &str) -> BillDraft {
        self.with_draft(tenant_id, |draft| {
            *draft = BillDraft::new(self.default_markup);
            draft.clone()
        })
    }
}
