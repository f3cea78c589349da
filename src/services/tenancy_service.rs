// src/services/tenancy_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, db::TenantRepository, models::tenancy::Tenant};

#[derive(Clone)]
pub struct TenancyService {
    tenant_repo: TenantRepository,
    pool: PgPool,
}

impl TenancyService {
    pub fn new(tenant_repo: TenantRepository, pool: PgPool) -> Self {
        Self { tenant_repo, pool }
    }

    pub async fn create_tenant(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Tenant, AppError> {
        let mut tx = self.pool.begin().await?;
        let tenant = self.tenant_repo.create_tenant(&mut *tx, name, description).await?;
        tx.commit().await?;
        Ok(tenant)
    }

    pub async fn list_tenants(&self) -> Result<Vec<Tenant>, AppError> {
        self.tenant_repo.list_tenants(&self.pool).await
    }

    /// Garante que o escopo do cabeçalho aponta para um tenant real.
    pub async fn ensure_exists(&self, id: Uuid) -> Result<Tenant, AppError> {
        self.tenant_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::TenantNotFound)
    }
}
