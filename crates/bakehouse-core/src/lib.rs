//! # bakehouse-core: Pure Business Logic for Bakehouse
//!
//! This crate is the **heart** of Bakehouse. It contains the billing engine,
//! recipe costing and invoice layout as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bakehouse Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web / Mobile Clients                         │   │
//! │  │   Inventory UI ──► Products UI ──► Billing UI ──► Dashboard     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │    /api/inventory, /api/products, /api/draft, /api/bills        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ bakehouse-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌──────┐ │   │
//! │  │   │  types  │  │  money  │  │ billing │  │ invoice │  │report│ │   │
//! │  │   │ recipe  │  │ Money   │  │BillDraft│  │ layout  │  │ dash │ │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └─────────┘  └──────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  bakehouse-db (Database Layer)                  │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (InventoryItem, Product, Percentage, Unit, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`billing`] - Bill drafts, totals and committed bills
//! - [`recipe`] - Product costing from inventory
//! - [`invoice`] - Paginated invoice layout
//! - [`report`] - Dashboard aggregates
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use bakehouse_core::billing::BillDraft;
//! use bakehouse_core::types::{CatalogProduct, Percentage};
//!
//! let catalog = vec![CatalogProduct {
//!     id: "cake".into(),
//!     name: "Chocolate Cake".into(),
//!     cost_basis_cents: 10000,
//!     weight_grams: 1000.0,
//! }];
//!
//! let mut draft = BillDraft::new(Percentage::from_percent(50));
//! draft.add_item("cake", &catalog).unwrap();
//!
//! // ₹100.00 cost at 50% markup sells for ₹150.00
//! let totals = draft.totals().unwrap();
//! assert_eq!(totals.total.cents(), 15000);
//! assert_eq!(totals.profit.cents(), 5000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod error;
pub mod invoice;
pub mod money;
pub mod recipe;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use billing::{AdditionalCost, AdditionalCostUpdate, Bill, BillDraft, BillTotals, LineItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Markup a fresh draft starts with.
///
/// ## Business Reason
/// Home bakers typically price at cost plus half. Deployments can override
/// it through configuration.
pub const DEFAULT_MARKUP: Percentage = Percentage::from_percent(50);
