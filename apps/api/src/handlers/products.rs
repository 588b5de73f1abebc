//! # Product Handlers
//!
//! Recipes costed from the tenant's inventory.
//!
//! ```text
//! { name, weightGrams, ingredients: [{ ingredientId, quantity }] }
//!        │
//!        ▼
//! inventory().list(tenant) ──► build_product / rebuild_product
//!        │                          │
//!        │                          └─ unknown ingredient ──► 404
//!        ▼
//! Product { ingredients: [{ cost_cents, .. }], total_cost_cents }
//! ```

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use bakehouse_core::recipe::{build_product, rebuild_product, ProductDraft, RecipeLine};
use bakehouse_core::validation::validate_uuid;
use bakehouse_core::{CatalogProduct, Product};
use bakehouse_db::ProductCatalog;

use super::AppJson;
use crate::auth::TenantContext;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRequest {
    pub ingredient_id: String,
    pub quantity: f64,
}

/// Body of create and update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub weight_grams: f64,
    #[serde(default)]
    pub ingredients: Vec<IngredientRequest>,
}

impl From<ProductRequest> for ProductDraft {
    fn from(req: ProductRequest) -> Self {
        ProductDraft {
            name: req.name,
            weight_grams: req.weight_grams,
            ingredients: req
                .ingredients
                .into_iter()
                .map(|line| RecipeLine {
                    ingredient_id: line.ingredient_id,
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}

/// `GET /api/products`
pub async fn list_products(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state.db.products().list(&tenant.tenant_id).await?;
    Ok(Json(products))
}

/// `GET /api/products/catalog`: the projection the billing screen picks from.
pub async fn product_catalog(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> ApiResult<Json<Vec<CatalogProduct>>> {
    let catalog = state.db.list_products(&tenant.tenant_id).await?;
    Ok(Json(catalog))
}

/// `POST /api/products`
pub async fn create_product(
    State(state): State<AppState>,
    tenant: TenantContext,
    AppJson(req): AppJson<ProductRequest>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let draft = ProductDraft::from(req);
    let inventory = state.db.inventory().list(&tenant.tenant_id).await?;

    let product = build_product(&tenant.tenant_id, &draft, &inventory, Utc::now())?;
    state.db.products().insert(&product).await?;

    info!(
        tenant_id = %tenant.tenant_id,
        product_id = %product.id,
        total_cost = %product.total_cost(),
        "Product created"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/products/{id}`
///
/// Ingredient costs are re-read from the current inventory.
pub async fn update_product(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
    AppJson(req): AppJson<ProductRequest>,
) -> ApiResult<Json<Product>> {
    validate_uuid(&id)?;
    let draft = ProductDraft::from(req);

    let mut product = state.db.products().get(&tenant.tenant_id, &id).await?;
    let inventory = state.db.inventory().list(&tenant.tenant_id).await?;

    rebuild_product(&mut product, &draft, &inventory, Utc::now())?;
    state.db.products().update(&product).await?;

    Ok(Json(product))
}

/// `DELETE /api/products/{id}`
///
/// Committed bills keep their copy of the product's lines.
pub async fn delete_product(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    validate_uuid(&id)?;
    state.db.products().delete(&tenant.tenant_id, &id).await?;

    info!(tenant_id = %tenant.tenant_id, product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
