// src/services/product_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::{
        product::{Product, ProductTenantData},
        tenant_data::{TenantDataInput, TenantFlagsView, WithFlags},
    },
    services::{catalog_service::CatalogService, tenant_data_service::TenantDataService},
};

/// Entrada por tenant do produto: as flags genéricas mais os escalares
/// daquele escopo (categoria e estoque).
#[derive(Debug, Clone)]
pub struct ProductTenantInput {
    pub data: TenantDataInput,
    pub category_id: Option<Uuid>,
    pub stock: Option<Decimal>,
}

#[derive(Clone)]
pub struct ProductService {
    product_repo: ProductRepository,
    tenant_data: TenantDataService,
    catalog: CatalogService,
    pool: PgPool,
}

impl ProductService {
    pub fn new(
        product_repo: ProductRepository,
        tenant_data: TenantDataService,
        catalog: CatalogService,
        pool: PgPool,
    ) -> Self {
        Self { product_repo, tenant_data, catalog, pool }
    }

    pub async fn create_product(
        &self,
        product_type_id: Uuid,
        measure_unit_id: Option<Uuid>,
        tax_class_id: Option<Uuid>,
        sku: &str,
        name: &str,
        description: Option<&str>,
        per_tenant: &[ProductTenantInput],
    ) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;

        let product = self
            .product_repo
            .create_product(
                &mut *tx,
                product_type_id,
                measure_unit_id,
                tax_class_id,
                sku,
                name,
                description,
            )
            .await?;

        let flag_input: Vec<TenantDataInput> =
            per_tenant.iter().map(|p| p.data.clone()).collect();
        let targets = self.catalog.target_scopes(&mut tx).await?;
        self.tenant_data
            .create_rows(&mut tx, &Product::TENANT_DATA, product.id, &flag_input, &targets)
            .await?;

        // Escalares por tenant entram depois das linhas, na mesma transação.
        for entry in per_tenant {
            if entry.category_id.is_some() || entry.stock.is_some() {
                self.product_repo
                    .update_data_scalars(
                        &mut *tx,
                        product.id,
                        entry.data.tenant_id,
                        entry.category_id,
                        entry.stock,
                    )
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        per_tenant: &[ProductTenantInput],
    ) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;

        let product = self
            .product_repo
            .update_product(&mut *tx, id, name, description)
            .await?;

        let flag_input: Vec<TenantDataInput> =
            per_tenant.iter().map(|p| p.data.clone()).collect();
        self.tenant_data
            .update_rows(&mut tx, &Product::TENANT_DATA, id, &flag_input)
            .await?;

        for entry in per_tenant {
            if entry.category_id.is_some() || entry.stock.is_some() {
                self.product_repo
                    .update_data_scalars(
                        &mut *tx,
                        id,
                        entry.data.tenant_id,
                        entry.category_id,
                        entry.stock,
                    )
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(product)
    }

    pub async fn get_product(
        &self,
        id: Uuid,
        scope: Option<Uuid>,
    ) -> Result<WithFlags<Product>, AppError> {
        let mut conn = self.pool.acquire().await?;
        let entity = self
            .product_repo
            .find_product(&mut *conn, id)
            .await?
            .ok_or(AppError::EntityNotFound("Produto"))?;
        let flags = self
            .tenant_data
            .resolve_flags(&mut conn, &Product::TENANT_DATA, id, scope)
            .await?;
        Ok(WithFlags { entity, flags })
    }

    /// Os dados completos do escopo (flags + escalares), para a tela de
    /// edição por tenant.
    pub async fn get_tenant_data(
        &self,
        id: Uuid,
        scope: Option<Uuid>,
    ) -> Result<(TenantFlagsView, Option<ProductTenantData>), AppError> {
        let mut conn = self.pool.acquire().await?;
        let flags = self
            .tenant_data
            .resolve_flags(&mut conn, &Product::TENANT_DATA, id, scope)
            .await?;
        let data = self.product_repo.fetch_tenant_data(&mut *conn, id, scope).await?;
        Ok((flags, data))
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        self.product_repo.list_products(&self.pool).await
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.tenant_data
            .guard_delete(&mut tx, &Product::TENANT_DATA, id)
            .await?;
        self.product_repo.delete_product(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Substitui o conjunto de valores de propriedade do produto.
    pub async fn set_property_values(
        &self,
        id: Uuid,
        value_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, AppError> {
        let mut tx = self.pool.begin().await?;

        self.product_repo
            .find_product(&mut *tx, id)
            .await?
            .ok_or(AppError::EntityNotFound("Produto"))?;

        self.product_repo
            .replace_property_values(&mut tx, id, value_ids)
            .await?;

        let current = self.product_repo.list_property_value_ids(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(current)
    }
}
