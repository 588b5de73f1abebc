//! # bakehouse-db: Database Layer for Bakehouse
//!
//! This crate provides tenant-scoped persistence for Bakehouse.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bakehouse Data Flow                              │
//! │                                                                         │
//! │  HTTP handler (POST /api/draft/commit)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   bakehouse-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ InventoryRepo │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo   │    │ 001_initial  │  │   │
//! │  │   │ + store traits│    │ BillRepo      │    │ _schema.sql  │  │   │
//! │  │   │               │    │ ProfileRepo   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                     ./bakehouse.db                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (inventory, product, bill, profile)
//! - [`store`] - `ProductCatalog` / `BillStore` seams used by billing
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bakehouse_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./bakehouse.db")).await?;
//!
//! let items = db.inventory().list("tenant-1").await?;
//! let catalog = db.products().catalog("tenant-1").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DbLocation};
pub use store::{BillStore, ProductCatalog};

// Repository re-exports for convenience
pub use repository::bill::BillRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::product::ProductRepository;
pub use repository::profile::ProfileRepository;
