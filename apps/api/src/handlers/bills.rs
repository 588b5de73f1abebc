//! # Bill Handlers
//!
//! Committed bills: list, create from a client-held draft, raw edit,
//! delete, and the printable invoice.
//!
//! ```text
//! POST /api/bills { items, additionalCosts, markupPercent, discountPercent, customer }
//!        │
//!        ▼
//! BillDraft::restore ──► services::billing::commit ──► 201 Bill
//!
//! GET /api/bills/{id}/invoice[?format=text]
//!        │
//!        ▼
//! bill + profile ──► render_invoice(layout from config) ──► JSON | text/plain
//! ```

use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Deserializer};
use tracing::info;

use bakehouse_core::billing::BillOverwrite;
use bakehouse_core::invoice::render_invoice;
use bakehouse_core::validation::{parse_percentage, validate_uuid};
use bakehouse_core::{AdditionalCost, Bill, BillDraft, CustomerDetails, LineItem};
use bakehouse_db::BillStore;

use super::draft::{AdditionalCostBody, LineItemBody};
use super::AppJson;
use crate::auth::TenantContext;
use crate::error::{ApiError, ApiResult};
use crate::services::billing;
use crate::state::AppState;

// =============================================================================
// Request Bodies
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CustomerBody {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A draft the client composed itself.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillRequest {
    #[serde(default)]
    pub customer: CustomerBody,
    pub items: Vec<LineItemBody>,
    #[serde(default)]
    pub additional_costs: Vec<AdditionalCostBody>,
    /// Defaults to the configured markup.
    pub markup_percent: Option<f64>,
    #[serde(default)]
    pub discount_percent: f64,
}

/// Field-level overwrite of a stored bill.
///
/// Nothing is re-derived: the figures sent are the figures stored. For the
/// customer fields `null` clears and an absent key keeps.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBillRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub customer_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub customer_phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub customer_address: Option<Option<String>>,
    pub items: Option<Vec<LineItemBody>>,
    pub additional_costs: Option<Vec<AdditionalCostBody>>,
    pub subtotal_cents: Option<i64>,
    pub additional_costs_total_cents: Option<i64>,
    pub discount_percent: Option<f64>,
    pub discount_amount_cents: Option<i64>,
    pub total_cents: Option<i64>,
    pub profit_cents: Option<i64>,
    pub markup_percent: Option<f64>,
}

/// Present-but-null becomes `Some(None)`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateBillRequest {
    fn into_overwrite(self) -> ApiResult<BillOverwrite> {
        let discount_bps = self
            .discount_percent
            .map(|pct| parse_percentage("discountPercent", pct).map(|p| p.bps()))
            .transpose()?;
        let markup_bps = self
            .markup_percent
            .map(|pct| parse_percentage("markupPercent", pct).map(|p| p.bps()))
            .transpose()?;

        Ok(BillOverwrite {
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            customer_address: self.customer_address,
            items: self
                .items
                .map(|items| items.into_iter().map(LineItem::from).collect()),
            additional_costs: self
                .additional_costs
                .map(|costs| costs.into_iter().map(AdditionalCost::from).collect()),
            subtotal_cents: self.subtotal_cents,
            additional_costs_total_cents: self.additional_costs_total_cents,
            discount_bps,
            discount_amount_cents: self.discount_amount_cents,
            total_cents: self.total_cents,
            profit_cents: self.profit_cents,
            markup_bps,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InvoiceQuery {
    pub format: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/bills`: oldest first.
pub async fn list_bills(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> ApiResult<Json<Vec<Bill>>> {
    let bills = state.db.list_bills(&tenant.tenant_id).await?;
    Ok(Json(bills))
}

/// `POST /api/bills`
///
/// Totals are recomputed from the submitted lines; client figures are
/// never trusted on create.
pub async fn create_bill(
    State(state): State<AppState>,
    tenant: TenantContext,
    AppJson(req): AppJson<CreateBillRequest>,
) -> ApiResult<(StatusCode, Json<Bill>)> {
    let markup = match req.markup_percent {
        Some(pct) => parse_percentage("markupPercent", pct)?,
        None => state.config.default_markup,
    };
    let discount = parse_percentage("discountPercent", req.discount_percent)?;

    let draft = BillDraft::restore(
        CustomerDetails {
            name: req.customer.name,
            phone: req.customer.phone,
            address: req.customer.address,
        },
        req.items.into_iter().map(LineItem::from).collect(),
        req.additional_costs
            .into_iter()
            .map(AdditionalCost::from)
            .collect(),
        markup,
        discount,
    )?;

    let bill = billing::commit(&state.db, &tenant.tenant_id, &draft).await?;
    Ok((StatusCode::CREATED, Json(bill)))
}

/// `PUT /api/bills/{id}`
pub async fn update_bill(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateBillRequest>,
) -> ApiResult<Json<Bill>> {
    validate_uuid(&id)?;
    let patch = req.into_overwrite()?;

    let mut bill = state.db.bills().get(&tenant.tenant_id, &id).await?;
    bill.overwrite(patch);
    state.db.bills().update(&bill).await?;

    info!(tenant_id = %tenant.tenant_id, bill_number = %bill.bill_number, "Bill overwritten");
    Ok(Json(bill))
}

/// `DELETE /api/bills/{id}`
pub async fn delete_bill(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    validate_uuid(&id)?;
    state.db.delete_bill(&tenant.tenant_id, &id).await?;

    info!(tenant_id = %tenant.tenant_id, bill_id = %id, "Bill deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/bills/{id}/invoice`
///
/// ## Formats
/// - default / `json`: paginated [`InvoiceDocument`] for the client to print
/// - `text`: fixed-width plain text, one block per page
///
/// [`InvoiceDocument`]: bakehouse_core::invoice::InvoiceDocument
pub async fn get_invoice(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
    Query(query): Query<InvoiceQuery>,
) -> ApiResult<Response> {
    validate_uuid(&id)?;

    let bill = state.db.bills().get(&tenant.tenant_id, &id).await?;
    let profile = state.db.profiles().get(&tenant.tenant_id).await?;
    let document = render_invoice(&bill, &profile, &state.config.invoice_layout());

    match query.format.as_deref() {
        None | Some("json") => Ok(Json(document).into_response()),
        Some("text") => Ok((
            [(CONTENT_TYPE, "text/plain; charset=utf-8")],
            document.to_text(),
        )
            .into_response()),
        Some(other) => Err(ApiError::validation(format!(
            "Unknown invoice format: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_null_clears_and_absent_keeps() {
        let req: UpdateBillRequest =
            serde_json::from_str(r#"{"customerName":null,"totalCents":500}"#).unwrap();
        let patch = req.into_overwrite().unwrap();

        assert_eq!(patch.customer_name, Some(None));
        assert_eq!(patch.customer_phone, None);
        assert_eq!(patch.total_cents, Some(500));
        assert_eq!(patch.items, None);
    }

    #[test]
    fn test_overwrite_converts_percentages() {
        let req: UpdateBillRequest =
            serde_json::from_str(r#"{"discountPercent":12.5,"markupPercent":40}"#).unwrap();
        let patch = req.into_overwrite().unwrap();

        assert_eq!(patch.discount_bps, Some(1250));
        assert_eq!(patch.markup_bps, Some(4000));
    }

    #[test]
    fn test_overwrite_rejects_negative_percent() {
        let req: UpdateBillRequest = serde_json::from_str(r#"{"discountPercent":-1}"#).unwrap();
        assert!(req.into_overwrite().is_err());
    }
}
