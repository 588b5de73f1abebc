//! # Repository Module
//!
//! Tenant-scoped repository implementations for Bakehouse.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler (TenantContext already extracted)                         │
//! │       │                                                                 │
//! │       │  db.products().get(&tenant.tenant_id, &id)                      │
//! │       ▼                                                                 │
//! │  ProductRepository                                                      │
//! │  ├── list(&self, tenant_id)                                             │
//! │  ├── get(&self, tenant_id, id)                                          │
//! │  ├── insert(&self, product)                                             │
//! │  ├── update(&self, product)                                             │
//! │  └── delete(&self, tenant_id, id)                                       │
//! │       │                                                                 │
//! │       │  SQL, always `WHERE tenant_id = ?`                              │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`InventoryRepository`](inventory::InventoryRepository) - Raw materials
//! - [`ProductRepository`](product::ProductRepository) - Recipes and the billing catalog
//! - [`BillRepository`](bill::BillRepository) - Committed bills and their lines
//! - [`ProfileRepository`](profile::ProfileRepository) - Invoice issuer details

pub mod bill;
pub mod inventory;
pub mod product;
pub mod profile;
