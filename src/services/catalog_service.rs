// src/services/catalog_service.rs

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, TenantRepository},
    models::{
        catalog::{Category, MeasureUnit, PriceList, ProductType, TaxClass},
        tenant_data::{TenantDataInput, WithFlags},
    },
    services::tenant_data_service::TenantDataService,
};

#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
    tenant_repo: TenantRepository,
    tenant_data: TenantDataService,
    pool: PgPool,
    tenancy_enabled: bool,
}

impl CatalogService {
    pub fn new(
        catalog_repo: CatalogRepository,
        tenant_repo: TenantRepository,
        tenant_data: TenantDataService,
        pool: PgPool,
        tenancy_enabled: bool,
    ) -> Self {
        Self { catalog_repo, tenant_repo, tenant_data, pool, tenancy_enabled }
    }

    /// O conjunto-alvo da criação: todos os tenants conhecidos, ou o escopo
    /// único NULL quando a tenancy está desativada.
    pub(crate) async fn target_scopes(
        &self,
        conn: &mut PgConnection,
    ) -> Result<Vec<Option<Uuid>>, AppError> {
        if !self.tenancy_enabled {
            return Ok(vec![None]);
        }
        let tenants = self.tenant_repo.list_tenants(&mut *conn).await?;
        Ok(tenants.into_iter().map(|t| Some(t.id)).collect())
    }

    // ---
    // Categorias
    // ---

    pub async fn create_category(
        &self,
        code: &str,
        name: &str,
        description: Option<&str>,
        parent_id: Option<Uuid>,
        per_tenant: &[TenantDataInput],
    ) -> Result<Category, AppError> {
        let mut tx = self.pool.begin().await?;

        let category = self
            .catalog_repo
            .create_category(&mut *tx, code, name, description, parent_id)
            .await?;

        let targets = self.target_scopes(&mut tx).await?;
        self.tenant_data
            .create_rows(&mut tx, &Category::TENANT_DATA, category.id, per_tenant, &targets)
            .await?;

        tx.commit().await?;
        Ok(category)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.catalog_repo.list_categories(&self.pool).await
    }

    // ---
    // Tipos de Produto
    // ---

    pub async fn create_product_type(
        &self,
        code: &str,
        name: &str,
        per_tenant: &[TenantDataInput],
    ) -> Result<ProductType, AppError> {
        let mut tx = self.pool.begin().await?;

        let product_type = self
            .catalog_repo
            .create_product_type(&mut *tx, code, name)
            .await?;

        let targets = self.target_scopes(&mut tx).await?;
        self.tenant_data
            .create_rows(&mut tx, &ProductType::TENANT_DATA, product_type.id, per_tenant, &targets)
            .await?;

        tx.commit().await?;
        Ok(product_type)
    }

    pub async fn get_product_type(
        &self,
        id: Uuid,
        scope: Option<Uuid>,
    ) -> Result<WithFlags<ProductType>, AppError> {
        let mut conn = self.pool.acquire().await?;
        let entity = self
            .catalog_repo
            .find_product_type(&mut *conn, id)
            .await?
            .ok_or(AppError::EntityNotFound("Tipo de produto"))?;
        let flags = self
            .tenant_data
            .resolve_flags(&mut conn, &ProductType::TENANT_DATA, id, scope)
            .await?;
        Ok(WithFlags { entity, flags })
    }

    pub async fn update_product_type(
        &self,
        id: Uuid,
        name: Option<&str>,
        per_tenant: &[TenantDataInput],
    ) -> Result<ProductType, AppError> {
        let mut tx = self.pool.begin().await?;

        let product_type = self
            .catalog_repo
            .update_product_type(&mut *tx, id, name)
            .await?;
        self.tenant_data
            .update_rows(&mut tx, &ProductType::TENANT_DATA, id, per_tenant)
            .await?;

        tx.commit().await?;
        Ok(product_type)
    }

    pub async fn delete_product_type(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.tenant_data
            .guard_delete(&mut tx, &ProductType::TENANT_DATA, id)
            .await?;
        self.catalog_repo.delete_product_type(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn list_product_types(&self) -> Result<Vec<ProductType>, AppError> {
        self.catalog_repo.list_product_types(&self.pool).await
    }

    // ---
    // Classes de Imposto
    // ---

    pub async fn create_tax_class(
        &self,
        name: &str,
        rate: Decimal,
        per_tenant: &[TenantDataInput],
    ) -> Result<TaxClass, AppError> {
        let mut tx = self.pool.begin().await?;

        let tax_class = self.catalog_repo.create_tax_class(&mut *tx, name, rate).await?;

        let targets = self.target_scopes(&mut tx).await?;
        self.tenant_data
            .create_rows(&mut tx, &TaxClass::TENANT_DATA, tax_class.id, per_tenant, &targets)
            .await?;

        tx.commit().await?;
        Ok(tax_class)
    }

    pub async fn get_tax_class(
        &self,
        id: Uuid,
        scope: Option<Uuid>,
    ) -> Result<WithFlags<TaxClass>, AppError> {
        let mut conn = self.pool.acquire().await?;
        let entity = self
            .catalog_repo
            .find_tax_class(&mut *conn, id)
            .await?
            .ok_or(AppError::EntityNotFound("Classe de imposto"))?;
        let flags = self
            .tenant_data
            .resolve_flags(&mut conn, &TaxClass::TENANT_DATA, id, scope)
            .await?;
        Ok(WithFlags { entity, flags })
    }

    pub async fn update_tax_class(
        &self,
        id: Uuid,
        name: Option<&str>,
        rate: Option<Decimal>,
        per_tenant: &[TenantDataInput],
    ) -> Result<TaxClass, AppError> {
        let mut tx = self.pool.begin().await?;

        let tax_class = self
            .catalog_repo
            .update_tax_class(&mut *tx, id, name, rate)
            .await?;
        self.tenant_data
            .update_rows(&mut tx, &TaxClass::TENANT_DATA, id, per_tenant)
            .await?;

        tx.commit().await?;
        Ok(tax_class)
    }

    pub async fn delete_tax_class(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.tenant_data
            .guard_delete(&mut tx, &TaxClass::TENANT_DATA, id)
            .await?;
        self.catalog_repo.delete_tax_class(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn list_tax_classes(&self) -> Result<Vec<TaxClass>, AppError> {
        self.catalog_repo.list_tax_classes(&self.pool).await
    }

    // ---
    // Unidades de Medida
    // ---

    pub async fn create_measure_unit(
        &self,
        name: &str,
        symbol: &str,
        per_tenant: &[TenantDataInput],
    ) -> Result<MeasureUnit, AppError> {
        let mut tx = self.pool.begin().await?;

        let unit = self.catalog_repo.create_measure_unit(&mut *tx, name, symbol).await?;

        let targets = self.target_scopes(&mut tx).await?;
        self.tenant_data
            .create_rows(&mut tx, &MeasureUnit::TENANT_DATA, unit.id, per_tenant, &targets)
            .await?;

        tx.commit().await?;
        Ok(unit)
    }

    pub async fn get_measure_unit(
        &self,
        id: Uuid,
        scope: Option<Uuid>,
    ) -> Result<WithFlags<MeasureUnit>, AppError> {
        let mut conn = self.pool.acquire().await?;
        let entity = self
            .catalog_repo
            .find_measure_unit(&mut *conn, id)
            .await?
            .ok_or(AppError::EntityNotFound("Unidade de medida"))?;
        let flags = self
            .tenant_data
            .resolve_flags(&mut conn, &MeasureUnit::TENANT_DATA, id, scope)
            .await?;
        Ok(WithFlags { entity, flags })
    }

    pub async fn update_measure_unit(
        &self,
        id: Uuid,
        name: Option<&str>,
        symbol: Option<&str>,
        per_tenant: &[TenantDataInput],
    ) -> Result<MeasureUnit, AppError> {
        let mut tx = self.pool.begin().await?;

        let unit = self
            .catalog_repo
            .update_measure_unit(&mut *tx, id, name, symbol)
            .await?;
        self.tenant_data
            .update_rows(&mut tx, &MeasureUnit::TENANT_DATA, id, per_tenant)
            .await?;

        tx.commit().await?;
        Ok(unit)
    }

    pub async fn delete_measure_unit(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.tenant_data
            .guard_delete(&mut tx, &MeasureUnit::TENANT_DATA, id)
            .await?;
        self.catalog_repo.delete_measure_unit(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn list_measure_units(&self) -> Result<Vec<MeasureUnit>, AppError> {
        self.catalog_repo.list_measure_units(&self.pool).await
    }

    // ---
    // Listas de Preço
    // ---

    pub async fn create_price_list(
        &self,
        code: &str,
        name: &str,
        currency: &str,
        per_tenant: &[TenantDataInput],
    ) -> Result<PriceList, AppError> {
        let mut tx = self.pool.begin().await?;

        let price_list = self
            .catalog_repo
            .create_price_list(&mut *tx, code, name, currency)
            .await?;

        let targets = self.target_scopes(&mut tx).await?;
        self.tenant_data
            .create_rows(&mut tx, &PriceList::TENANT_DATA, price_list.id, per_tenant, &targets)
            .await?;

        tx.commit().await?;
        Ok(price_list)
    }

    pub async fn get_price_list(
        &self,
        id: Uuid,
        scope: Option<Uuid>,
    ) -> Result<WithFlags<PriceList>, AppError> {
        let mut conn = self.pool.acquire().await?;
        let entity = self
            .catalog_repo
            .find_price_list(&mut *conn, id)
            .await?
            .ok_or(AppError::EntityNotFound("Lista de preço"))?;
        let flags = self
            .tenant_data
            .resolve_flags(&mut conn, &PriceList::TENANT_DATA, id, scope)
            .await?;
        Ok(WithFlags { entity, flags })
    }

    pub async fn update_price_list(
        &self,
        id: Uuid,
        name: Option<&str>,
        currency: Option<&str>,
        per_tenant: &[TenantDataInput],
    ) -> Result<PriceList, AppError> {
        let mut tx = self.pool.begin().await?;

        let price_list = self
            .catalog_repo
            .update_price_list(&mut *tx, id, name, currency)
            .await?;
        self.tenant_data
            .update_rows(&mut tx, &PriceList::TENANT_DATA, id, per_tenant)
            .await?;

        tx.commit().await?;
        Ok(price_list)
    }

    pub async fn delete_price_list(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.tenant_data
            .guard_delete(&mut tx, &PriceList::TENANT_DATA, id)
            .await?;
        self.catalog_repo.delete_price_list(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn list_price_lists(&self) -> Result<Vec<PriceList>, AppError> {
        self.catalog_repo.list_price_lists(&self.pool).await
    }
}
