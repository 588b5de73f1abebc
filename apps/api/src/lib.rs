//! # bakehouse-api: HTTP Surface of Bakehouse
//!
//! axum server exposing inventory, products, the billing draft, committed
//! bills, invoices and the dashboard to the web and mobile clients.
//!
//! ## Request Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Request Path                                         │
//! │                                                                         │
//! │  HTTP ──► TraceLayer ──► CorsLayer ──► Router                           │
//! │                                          │                              │
//! │                  ┌───────────────────────┼──────────────────────┐       │
//! │                  ▼                       ▼                      ▼       │
//! │             /health              /api/* handlers           fallback     │
//! │           (no auth)                    │                  404 JSON      │
//! │                                        ▼                                │
//! │                            TenantContext (Bearer JWT)                   │
//! │                                        │                                │
//! │                   ┌────────────────────┼────────────────────┐           │
//! │                   ▼                    ▼                    ▼           │
//! │             bakehouse-core       DraftState           bakehouse-db      │
//! │            (billing math)      (per-tenant draft)   (tenant-scoped SQL) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`config`] - Environment configuration
//! - [`auth`] - JWT verification and the tenant extractor
//! - [`state`] - Shared state (database, drafts)
//! - [`handlers`] - One module per resource
//! - [`services`] - Flows spanning core and storage
//! - [`error`] - API error type and HTTP mapping

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod services;
pub mod state;

use axum::http::Uri;
use axum::routing::{get, patch, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, ErrorCode};
use crate::handlers::{bills, dashboard, draft, health, inventory, products, profile};

pub use crate::config::ApiConfig;
pub use crate::state::AppState;

/// Builds the application router.
///
/// ## Usage
/// ```rust,ignore
/// let app = bakehouse_api::router(AppState::new(db, config));
/// axum::serve(listener, app).await?;
/// ```
pub fn router(state: AppState) -> Router {
    let cors = if state.config.cors_allow_any {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    let api = Router::new()
        // Profile
        .route(
            "/users/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        // Inventory
        .route(
            "/inventory",
            get(inventory::list_inventory).post(inventory::create_inventory_item),
        )
        .route(
            "/inventory/{id}",
            put(inventory::update_inventory_item).delete(inventory::delete_inventory_item),
        )
        // Products
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/catalog", get(products::product_catalog))
        .route(
            "/products/{id}",
            put(products::update_product).delete(products::delete_product),
        )
        // Bills
        .route("/bills", get(bills::list_bills).post(bills::create_bill))
        .route(
            "/bills/{id}",
            put(bills::update_bill).delete(bills::delete_bill),
        )
        .route("/bills/{id}/invoice", get(bills::get_invoice))
        // Draft
        .route("/draft", get(draft::get_draft).delete(draft::reset_draft))
        .route("/draft/items", post(draft::add_item))
        .route(
            "/draft/items/{product_id}/quantity",
            put(draft::set_item_quantity),
        )
        .route("/draft/items/{product_id}/price", put(draft::set_item_price))
        .route("/draft/markup", put(draft::set_markup))
        .route("/draft/discount", put(draft::set_discount))
        .route("/draft/customer", put(draft::set_customer))
        .route("/draft/costs", post(draft::add_cost))
        .route(
            "/draft/costs/{id}",
            patch(draft::update_cost).delete(draft::remove_cost),
        )
        .route("/draft/commit", post(draft::commit_draft))
        // Dashboard
        .route("/dashboard", get(dashboard::dashboard));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::new(
        ErrorCode::NotFound,
        format!("Route not found: {}", uri.path()),
    )
}
