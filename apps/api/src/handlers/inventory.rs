//! # Inventory Handlers
//!
//! Raw materials a tenant buys. The cost per unit derived here is what
//! product recipes are priced from.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Inventory Entry                                                        │
//! │                                                                         │
//! │  { name: "Flour", totalQuantity: 1000, unit: "grams",                   │
//! │    totalCostCents: 4500 }                                               │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  validate ──► InventoryItem::new ──► cost_per_unit = 4.5 paise/g        │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  201 Created { id, ..., cost_per_unit }                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Editing an item does not re-cost existing products; they pick up the
//! new price the next time they are saved.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

use bakehouse_core::validation::{
    validate_name, validate_positive_amount, validate_positive_quantity, validate_uuid,
};
use bakehouse_core::{InventoryItem, Money, Unit};

use super::AppJson;
use crate::auth::TenantContext;
use crate::error::ApiResult;
use crate::state::AppState;

/// Body of create and update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRequest {
    pub name: String,
    pub total_quantity: f64,
    pub unit: Unit,
    pub total_cost_cents: i64,
}

/// Checked fields of an [`InventoryRequest`].
struct ValidInventory {
    name: String,
    total_quantity: f64,
    unit: Unit,
    total_cost: Money,
}

impl InventoryRequest {
    fn validate(self) -> ApiResult<ValidInventory> {
        let name = validate_name("name", &self.name)?;
        validate_positive_quantity("totalQuantity", self.total_quantity)?;
        let total_cost = Money::from_cents(self.total_cost_cents);
        validate_positive_amount("totalCost", total_cost)?;

        Ok(ValidInventory {
            name,
            total_quantity: self.total_quantity,
            unit: self.unit,
            total_cost,
        })
    }
}

/// `GET /api/inventory`: oldest first.
pub async fn list_inventory(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> ApiResult<Json<Vec<InventoryItem>>> {
    let items = state.db.inventory().list(&tenant.tenant_id).await?;
    Ok(Json(items))
}

/// `POST /api/inventory`
pub async fn create_inventory_item(
    State(state): State<AppState>,
    tenant: TenantContext,
    AppJson(req): AppJson<InventoryRequest>,
) -> ApiResult<(StatusCode, Json<InventoryItem>)> {
    let valid = req.validate()?;

    let item = InventoryItem::new(
        &tenant.tenant_id,
        valid.name,
        valid.total_quantity,
        valid.unit,
        valid.total_cost,
        Utc::now(),
    );
    state.db.inventory().insert(&item).await?;

    info!(
        tenant_id = %tenant.tenant_id,
        item_id = %item.id,
        name = %item.name,
        "Inventory item created"
    );
    Ok((StatusCode::CREATED, Json(item)))
}

/// `PUT /api/inventory/{id}`: replaces every editable field.
pub async fn update_inventory_item(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
    AppJson(req): AppJson<InventoryRequest>,
) -> ApiResult<Json<InventoryItem>> {
    validate_uuid(&id)?;
    let valid = req.validate()?;
    debug!(tenant_id = %tenant.tenant_id, item_id = %id, "update_inventory_item");

    let mut item = state.db.inventory().get(&tenant.tenant_id, &id).await?;
    item.apply_update(
        valid.name,
        valid.total_quantity,
        valid.unit,
        valid.total_cost,
        Utc::now(),
    );
    state.db.inventory().update(&item).await?;

    Ok(Json(item))
}

/// `DELETE /api/inventory/{id}`
///
/// Products keep their recipe snapshot of a deleted ingredient.
pub async fn delete_inventory_item(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    validate_uuid(&id)?;
    state.db.inventory().delete(&tenant.tenant_id, &id).await?;

    info!(tenant_id = %tenant.tenant_id, item_id = %id, "Inventory item deleted");
    Ok(StatusCode::NO_CONTENT)
}
