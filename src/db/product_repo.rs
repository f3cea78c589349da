// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::product::{Product, ProductTenantData},
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        product_type_id: Uuid,
        measure_unit_id: Option<Uuid>,
        tax_class_id: Option<Uuid>,
        sku: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (product_type_id, measure_unit_id, tax_class_id, sku, name, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(product_type_id)
        .bind(measure_unit_id)
        .bind(tax_class_id)
        .bind(sku)
        .bind(name)
        .bind(description)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::CodeAlreadyExists(sku.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn list_products<'e, E>(&self, executor: E) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY name ASC")
            .fetch_all(executor)
            .await?;
        Ok(products)
    }

    pub async fn find_product<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let found = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(found)
    }

    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::EntityNotFound("Produto"))
    }

    pub async fn delete_product<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::EntityNotFound("Produto"));
        }
        Ok(())
    }

    // ---
    // Escalares por tenant (categoria e estoque)
    // ---
    // A linha já existe (o upsert genérico das flags roda antes na mesma
    // transação); aqui só gravamos os escalares daquele escopo.

    pub async fn update_data_scalars<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        tenant_id: Option<Uuid>,
        category_id: Option<Uuid>,
        stock: Option<Decimal>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE product_data
            SET category_id = COALESCE($3, category_id),
                stock = COALESCE($4, stock)
            WHERE product_id = $1 AND tenant_id IS NOT DISTINCT FROM $2
            "#,
        )
        .bind(product_id)
        .bind(tenant_id)
        .bind(category_id)
        .bind(stock)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn fetch_tenant_data<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        tenant_id: Option<Uuid>,
    ) -> Result<Option<ProductTenantData>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let data = sqlx::query_as::<_, ProductTenantData>(
            r#"
            SELECT tenant_id, is_active, category_id, stock
            FROM product_data
            WHERE product_id = $1 AND tenant_id IS NOT DISTINCT FROM $2
            "#,
        )
        .bind(product_id)
        .bind(tenant_id)
        .fetch_optional(executor)
        .await?;
        Ok(data)
    }

    // ---
    // Pivot produto <-> valor de propriedade
    // ---

    /// Substitui o conjunto de valores de propriedade vinculados ao produto.
    /// ON CONFLICT DO NOTHING deduplica contra a chave composta do pivot.
    pub async fn replace_property_values(
        &self,
        conn: &mut sqlx::PgConnection,
        product_id: Uuid,
        value_ids: &[Uuid],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM product_property_values WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut *conn)
            .await?;

        for value_id in value_ids {
            sqlx::query(
                r#"
                INSERT INTO product_property_values (product_id, property_value_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(product_id)
            .bind(value_id)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    pub async fn list_property_value_ids<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<Vec<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT property_value_id FROM product_property_values WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_all(executor)
        .await?;
        Ok(ids)
    }
}
