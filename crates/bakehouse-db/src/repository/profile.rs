//! # Tenant Profile Repository
//!
//! One row per tenant holding the issuer block printed on invoices.
//! A tenant that never saved a profile reads back as an empty one.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use bakehouse_core::TenantProfile;

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    tenant_id: String,
    name: String,
    bakery_name: String,
    bakery_address: String,
    bakery_phone: String,
    bakery_email: String,
    updated_at: Option<DateTime<Utc>>,
}

impl From<ProfileRow> for TenantProfile {
    fn from(row: ProfileRow) -> Self {
        TenantProfile {
            tenant_id: row.tenant_id,
            name: row.name,
            bakery_name: row.bakery_name,
            bakery_address: row.bakery_address,
            bakery_phone: row.bakery_phone,
            bakery_email: row.bakery_email,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for tenant profiles.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: SqlitePool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProfileRepository { pool }
    }

    /// Gets the tenant's profile, or an empty one if none is stored.
    pub async fn get(&self, tenant_id: &str) -> DbResult<TenantProfile> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r#"
            SELECT tenant_id, name, bakery_name, bakery_address,
                   bakery_phone, bakery_email, updated_at
            FROM tenant_profiles
            WHERE tenant_id = ?1
            "#,
        )
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row
            .map(TenantProfile::from)
            .unwrap_or_else(|| TenantProfile::empty(tenant_id)))
    }

    /// Inserts or replaces the tenant's profile.
    pub async fn upsert(&self, profile: &TenantProfile) -> DbResult<()> {
        debug!(tenant_id = %profile.tenant_id, "Saving tenant profile");

        sqlx::query(
            r#"
            INSERT INTO tenant_profiles (
                tenant_id, name, bakery_name, bakery_address,
                bakery_phone, bakery_email, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT (tenant_id) DO UPDATE SET
                name = excluded.name,
                bakery_name = excluded.bakery_name,
                bakery_address = excluded.bakery_address,
                bakery_phone = excluded.bakery_phone,
                bakery_email = excluded.bakery_email,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&profile.tenant_id)
        .bind(&profile.name)
        .bind(&profile.bakery_name)
        .bind(&profile.bakery_address)
        .bind(&profile.bakery_phone)
        .bind(&profile.bakery_email)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use bakehouse_core::ProfileUpdate;

    #[tokio::test]
    async fn test_missing_profile_is_empty() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let profile = db.profiles().get("t1").await.unwrap();
        assert_eq!(profile, TenantProfile::empty("t1"));
    }

    #[tokio::test]
    async fn test_upsert_twice() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut profile = TenantProfile::empty("t1");
        profile.apply(
            ProfileUpdate {
                bakery_name: Some("Sweet Crumbs".to_string()),
                bakery_phone: Some("98765 43210".to_string()),
                ..Default::default()
            },
            Utc::now(),
        );
        db.profiles().upsert(&profile).await.unwrap();

        profile.apply(
            ProfileUpdate {
                bakery_phone: Some(String::new()),
                ..Default::default()
            },
            Utc::now(),
        );
        db.profiles().upsert(&profile).await.unwrap();

        let stored = db.profiles().get("t1").await.unwrap();
        assert_eq!(stored.bakery_name, "Sweet Crumbs");
        assert_eq!(stored.bakery_phone, "");
        assert!(stored.updated_at.is_some());
        assert_eq!(db.profiles().get("t2").await.unwrap().bakery_name, "");
    }
}
