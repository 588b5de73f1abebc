//! # HTTP Handlers
//!
//! One module per resource. Every `/api` handler takes a [`TenantContext`]
//! and scopes all work to that tenant.
//!
//! ## Wire Conventions
//! - Request bodies and API-shaped views (draft, profile) are camelCase
//! - Stored records (inventory items, products, bills) serialize as-is
//! - Money is always integer paise (`...Cents`)
//! - Percentages in requests are plain percents (`12.5` = 12.5 %)
//!
//! [`TenantContext`]: crate::auth::TenantContext

use axum::extract::FromRequest;

use crate::error::ApiError;

pub mod bills;
pub mod dashboard;
pub mod draft;
pub mod health;
pub mod inventory;
pub mod products;
pub mod profile;

/// JSON body extractor whose rejections use the API error shape.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);
