//! # Draft Handlers
//!
//! The server-held bill each tenant is composing.
//!
//! ## Draft Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Lifecycle                                      │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ Editing  │────►│  Commit  │────►│  Stored  │       │
//! │  │  Draft   │     │          │     │          │     │   Bill   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   items, markup,     failure: draft                     │
//! │                   discount, costs,   kept as it was                     │
//! │                   customer                                              │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   DELETE /api/draft ─────────────►                      │
//! │                                                    (back to empty)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every handler answers with the whole draft and its derived totals, so the
//! client never computes money itself.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use bakehouse_core::validation::parse_percentage;
use bakehouse_core::{
    AdditionalCost, AdditionalCostUpdate, Bill, BillDraft, BillTotals, CoreError,
    CustomerDetails, LineItem, Money,
};
use bakehouse_db::ProductCatalog;

use super::AppJson;
use crate::auth::TenantContext;
use crate::error::{ApiError, ApiResult};
use crate::services::billing;
use crate::state::AppState;

// =============================================================================
// Wire Types
// =============================================================================

/// One line of a draft or a client-held bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemBody {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub cost_price_cents: i64,
    pub selling_price_cents: i64,
    /// Ignored when a draft is rebuilt; defaults to price × quantity.
    #[serde(default)]
    pub total_cents: Option<i64>,
}

impl From<&LineItem> for LineItemBody {
    fn from(item: &LineItem) -> Self {
        LineItemBody {
            product_id: item.product_id.clone(),
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            cost_price_cents: item.cost_price_cents,
            selling_price_cents: item.selling_price_cents,
            total_cents: Some(item.total_cents),
        }
    }
}

impl From<LineItemBody> for LineItem {
    fn from(body: LineItemBody) -> Self {
        let total_cents = body
            .total_cents
            .unwrap_or_else(|| body.selling_price_cents.saturating_mul(body.quantity));
        LineItem {
            product_id: body.product_id,
            product_name: body.product_name,
            quantity: body.quantity,
            cost_price_cents: body.cost_price_cents,
            selling_price_cents: body.selling_price_cents,
            total_cents,
        }
    }
}

/// A flat extra charge (delivery, packaging).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalCostBody {
    /// Generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub description: String,
    pub amount_cents: i64,
}

impl From<&AdditionalCost> for AdditionalCostBody {
    fn from(cost: &AdditionalCost) -> Self {
        AdditionalCostBody {
            id: Some(cost.id.clone()),
            description: cost.description.clone(),
            amount_cents: cost.amount_cents,
        }
    }
}

impl From<AdditionalCostBody> for AdditionalCost {
    fn from(body: AdditionalCostBody) -> Self {
        AdditionalCost {
            id: body
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            description: body.description,
            amount_cents: body.amount_cents,
        }
    }
}

/// Derived figures of a draft, all in paise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsBody {
    pub subtotal_cents: i64,
    pub additional_costs_total_cents: i64,
    pub discount_amount_cents: i64,
    pub total_cents: i64,
    pub total_cost_basis_cents: i64,
    pub profit_cents: i64,
}

impl From<BillTotals> for TotalsBody {
    fn from(totals: BillTotals) -> Self {
        TotalsBody {
            subtotal_cents: totals.subtotal.cents(),
            additional_costs_total_cents: totals.additional_costs_total.cents(),
            discount_amount_cents: totals.discount_amount.cents(),
            total_cents: totals.total.cents(),
            total_cost_basis_cents: totals.total_cost_basis.cents(),
            profit_cents: totals.profit.cents(),
        }
    }
}

/// Draft response including items, settings and totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    pub customer: CustomerDetails,
    pub items: Vec<LineItemBody>,
    pub additional_costs: Vec<AdditionalCostBody>,
    pub markup_percent: f64,
    pub discount_percent: f64,
    pub totals: TotalsBody,
}

impl TryFrom<&BillDraft> for DraftResponse {
    type Error = CoreError;

    fn try_from(draft: &BillDraft) -> Result<Self, CoreError> {
        Ok(DraftResponse {
            customer: draft.customer().clone(),
            items: draft.items().iter().map(LineItemBody::from).collect(),
            additional_costs: draft
                .additional_costs()
                .iter()
                .map(AdditionalCostBody::from)
                .collect(),
            markup_percent: draft.markup().percentage(),
            discount_percent: draft.discount().percentage(),
            totals: draft.totals()?.into(),
        })
    }
}

// =============================================================================
// Request Bodies
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: String,
}

#[derive(Debug, Deserialize)]
pub struct QuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRequest {
    pub selling_price_cents: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkupRequest {
    pub markup_percent: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountRequest {
    pub discount_percent: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct CustomerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Either field may be sent alone.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCostRequest {
    pub description: Option<String>,
    pub amount_cents: Option<i64>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Gets the current draft.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Billing screen (always visible)                                        │
/// │                                                                         │
/// │  ┌────────────────────────────────────────────────────────────────┐    │
/// │  │  BILL                                    markup 50%            │    │
/// │  ├────────────────────────────────────────────────────────────────┤    │
/// │  │  Chocolate Cake        x2     ₹150.00        ₹300.00           │    │
/// │  │  Delivery                                     ₹20.00           │    │
/// │  ├────────────────────────────────────────────────────────────────┤    │
/// │  │  Discount (10%)                              -₹30.00           │    │
/// │  │  TOTAL                                       ₹290.00           │    │
/// │  └────────────────────────────────────────────────────────────────┘    │
/// │                                                                         │
/// │  GET /api/draft → { items: [...], totals: {...} }                       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn get_draft(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> ApiResult<Json<DraftResponse>> {
    let draft = state.drafts.snapshot(&tenant.tenant_id);
    Ok(Json(DraftResponse::try_from(&draft)?))
}

/// Discards the draft. Markup and discount return to their defaults.
pub async fn reset_draft(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> ApiResult<Json<DraftResponse>> {
    debug!(tenant_id = %tenant.tenant_id, "reset_draft");
    let draft = state.drafts.reset(&tenant.tenant_id);
    Ok(Json(DraftResponse::try_from(&draft)?))
}

/// Adds one unit of a product.
///
/// ## Behavior
/// - Product already on the draft: quantity increases, price re-derived
/// - Product not on the draft: added at quantity 1
/// - Product not in the tenant's catalog: nothing changes
/// - Line already at the quantity cap: 400, nothing changes
///
/// The catalog is fetched before the draft is locked, so the lock is never
/// held across the database call.
pub async fn add_item(
    State(state): State<AppState>,
    tenant: TenantContext,
    AppJson(req): AppJson<AddItemRequest>,
) -> ApiResult<Json<DraftResponse>> {
    let catalog = state.db.list_products(&tenant.tenant_id).await?;

    let response = state.drafts.with_draft(&tenant.tenant_id, |draft| {
        if !draft.add_item(&req.product_id, &catalog)? {
            debug!(product_id = %req.product_id, "add_item ignored: not in catalog");
        }
        DraftResponse::try_from(&*draft)
    })?;

    Ok(Json(response))
}

/// Sets an item's quantity. Zero or below removes the line; above the
/// per-line cap is a 400 and the draft is left as it was.
pub async fn set_item_quantity(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(product_id): Path<String>,
    AppJson(req): AppJson<QuantityRequest>,
) -> ApiResult<Json<DraftResponse>> {
    debug!(product_id = %product_id, quantity = %req.quantity, "set_item_quantity");

    let response = state.drafts.with_draft(&tenant.tenant_id, |draft| {
        draft.set_item_quantity(&product_id, req.quantity)?;
        DraftResponse::try_from(&*draft)
    })?;

    Ok(Json(response))
}

/// Overrides one item's selling price. A later markup change reprices it again.
pub async fn set_item_price(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(product_id): Path<String>,
    AppJson(req): AppJson<PriceRequest>,
) -> ApiResult<Json<DraftResponse>> {
    let price = Money::from_cents(req.selling_price_cents);

    let response = state.drafts.with_draft(&tenant.tenant_id, |draft| {
        draft.set_item_price(&product_id, price)?;
        DraftResponse::try_from(&*draft)
    })?;

    Ok(Json(response))
}

/// Sets the markup and reprices every line from its cost price.
pub async fn set_markup(
    State(state): State<AppState>,
    tenant: TenantContext,
    AppJson(req): AppJson<MarkupRequest>,
) -> ApiResult<Json<DraftResponse>> {
    let markup = parse_percentage("markupPercent", req.markup_percent)?;

    let response = state.drafts.with_draft(&tenant.tenant_id, |draft| {
        draft.set_markup(markup)?;
        DraftResponse::try_from(&*draft)
    })?;

    Ok(Json(response))
}

/// Sets the discount (0-100 %).
pub async fn set_discount(
    State(state): State<AppState>,
    tenant: TenantContext,
    AppJson(req): AppJson<DiscountRequest>,
) -> ApiResult<Json<DraftResponse>> {
    let discount = parse_percentage("discountPercent", req.discount_percent)?;

    let response = state.drafts.with_draft(&tenant.tenant_id, |draft| {
        draft.set_discount(discount)?;
        DraftResponse::try_from(&*draft)
    })?;

    Ok(Json(response))
}

/// Sets the "Bill To" block. Blank fields are dropped.
pub async fn set_customer(
    State(state): State<AppState>,
    tenant: TenantContext,
    AppJson(req): AppJson<CustomerRequest>,
) -> ApiResult<Json<DraftResponse>> {
    let details = CustomerDetails {
        name: req.name,
        phone: req.phone,
        address: req.address,
    };

    let response = state.drafts.with_draft(&tenant.tenant_id, |draft| {
        draft.set_customer(details);
        DraftResponse::try_from(&*draft)
    })?;

    Ok(Json(response))
}

/// Appends an empty additional cost; it is the last entry of the response.
pub async fn add_cost(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> ApiResult<(StatusCode, Json<DraftResponse>)> {
    let response = state.drafts.with_draft(&tenant.tenant_id, |draft| {
        let id = draft.add_additional_cost();
        debug!(cost_id = %id, "add_cost");
        DraftResponse::try_from(&*draft)
    })?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Edits an additional cost's description and/or amount.
pub async fn update_cost(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(cost_id): Path<String>,
    AppJson(req): AppJson<UpdateCostRequest>,
) -> ApiResult<Json<DraftResponse>> {
    if req.description.is_none() && req.amount_cents.is_none() {
        return Err(ApiError::validation("Nothing to update"));
    }

    let response = state.drafts.with_draft(&tenant.tenant_id, |draft| {
        // Amount first: it is the only field that can be rejected, so a
        // failed request leaves the cost untouched.
        if let Some(cents) = req.amount_cents {
            let amount = AdditionalCostUpdate::Amount(Money::from_cents(cents));
            draft.update_additional_cost(&cost_id, amount)?;
        }
        if let Some(description) = req.description {
            let description = AdditionalCostUpdate::Description(description);
            draft.update_additional_cost(&cost_id, description)?;
        }
        DraftResponse::try_from(&*draft)
    })?;

    Ok(Json(response))
}

/// Removes an additional cost.
pub async fn remove_cost(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(cost_id): Path<String>,
) -> ApiResult<Json<DraftResponse>> {
    let response = state.drafts.with_draft(&tenant.tenant_id, |draft| {
        if draft.remove_additional_cost(&cost_id) {
            DraftResponse::try_from(&*draft)
        } else {
            Err(CoreError::AdditionalCostNotFound(cost_id.clone()))
        }
    })?;

    Ok(Json(response))
}

/// Commits the draft as a bill, then starts a fresh draft.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  User clicks "Save Bill"                                                │
/// │                    │                                                    │
/// │                    ▼                                                    │
/// │  POST /api/draft/commit                                                 │
/// │                    │                                                    │
/// │                    ▼                                                    │
/// │  ┌────────────────────────────────────────────────────────────────┐    │
/// │  │  0. Claim the draft: another commit in flight → 409            │    │
/// │  │  1. Snapshot the draft (lock released right after)             │    │
/// │  │  2. Finalize: empty draft → 400, nothing stored                │    │
/// │  │  3. Persist bill + lines in one transaction                    │    │
/// │  │  4. Success only: reset the draft                              │    │
/// │  └────────────────────────────────────────────────────────────────┘    │
/// │                    │                                                    │
/// │                    ▼                                                    │
/// │  201 Created { id, bill_number, total_cents, ... }                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn commit_draft(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> ApiResult<(StatusCode, Json<Bill>)> {
    let Some(_claim) = state.drafts.begin_commit(&tenant.tenant_id) else {
        return Err(ApiError::conflict("This draft is already being committed"));
    };
    let draft = state.drafts.snapshot(&tenant.tenant_id);

    let bill = billing::commit(&state.db, &tenant.tenant_id, &draft).await?;
    state.drafts.reset(&tenant.tenant_id);

    info!(tenant_id = %tenant.tenant_id, bill_id = %bill.id, "Draft reset after commit");
    Ok((StatusCode::CREATED, Json(bill)))
}
