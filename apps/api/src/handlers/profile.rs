//! # Profile Handlers
//!
//! The tenant's issuer details, printed at the top of every invoice.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use bakehouse_core::{ProfileUpdate, TenantProfile};

use super::AppJson;
use crate::auth::TenantContext;
use crate::error::ApiResult;
use crate::state::AppState;

/// Partial profile update. Absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bakery_name: Option<String>,
    pub bakery_address: Option<String>,
    pub bakery_phone: Option<String>,
    pub bakery_email: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfileUpdate {
            name: req.name,
            bakery_name: req.bakery_name,
            bakery_address: req.bakery_address,
            bakery_phone: req.bakery_phone,
            bakery_email: req.bakery_email,
        }
    }
}

/// `GET /api/users/profile`
///
/// A tenant that never saved a profile gets an empty one, not a 404.
pub async fn get_profile(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> ApiResult<Json<TenantProfile>> {
    let profile = state.db.profiles().get(&tenant.tenant_id).await?;
    Ok(Json(profile))
}

/// `PUT /api/users/profile`
pub async fn update_profile(
    State(state): State<AppState>,
    tenant: TenantContext,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> ApiResult<Json<TenantProfile>> {
    debug!(tenant_id = %tenant.tenant_id, "update_profile");

    let mut profile = state.db.profiles().get(&tenant.tenant_id).await?;
    profile.apply(req.into(), Utc::now());
    state.db.profiles().upsert(&profile).await?;

    Ok(Json(profile))
}
