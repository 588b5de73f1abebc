//! Dashboard figures for the tenant's home screen.

use axum::extract::State;
use axum::Json;

use bakehouse_core::report::DashboardSummary;
use bakehouse_db::BillStore;

use crate::auth::TenantContext;
use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /api/dashboard`
pub async fn dashboard(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> ApiResult<Json<DashboardSummary>> {
    let inventory = state.db.inventory().list(&tenant.tenant_id).await?;
    let products = state.db.products().list(&tenant.tenant_id).await?;
    let bills = state.db.list_bills(&tenant.tenant_id).await?;

    Ok(Json(DashboardSummary::compute(&inventory, &products, &bills)))
}
