// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{Category, MeasureUnit, PriceList, ProductType, TaxClass},
};

// Mapeia violação de unicidade (código/nome duplicado) para o erro de
// negócio; o resto vira DatabaseError.
fn map_unique(e: sqlx::Error, code: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::CodeAlreadyExists(code.to_string());
        }
    }
    e.into()
}

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Categorias
    // ---

    pub async fn create_category<'e, E>(
        &self,
        executor: E,
        code: &str,
        name: &str,
        description: Option<&str>,
        parent_id: Option<Uuid>,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (code, name, description, parent_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(description)
        .bind(parent_id)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique(e, code))
    }

    pub async fn list_categories<'e, E>(&self, executor: E) -> Result<Vec<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
                .fetch_all(executor)
                .await?;
        Ok(categories)
    }

    // ---
    // Tipos de Produto
    // ---

    pub async fn create_product_type<'e, E>(
        &self,
        executor: E,
        code: &str,
        name: &str,
    ) -> Result<ProductType, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ProductType>(
            r#"
            INSERT INTO product_types (code, name)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique(e, code))
    }

    pub async fn list_product_types<'e, E>(&self, executor: E) -> Result<Vec<ProductType>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let types =
            sqlx::query_as::<_, ProductType>("SELECT * FROM product_types ORDER BY name ASC")
                .fetch_all(executor)
                .await?;
        Ok(types)
    }

    pub async fn find_product_type<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<ProductType>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let found = sqlx::query_as::<_, ProductType>("SELECT * FROM product_types WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(found)
    }

    pub async fn update_product_type<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
    ) -> Result<ProductType, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ProductType>(
            r#"
            UPDATE product_types
            SET name = COALESCE($2, name), updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::EntityNotFound("Tipo de produto"))
    }

    pub async fn delete_product_type<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM product_types WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::EntityNotFound("Tipo de produto"));
        }
        Ok(())
    }

    // ---
    // Classes de Imposto
    // ---

    pub async fn create_tax_class<'e, E>(
        &self,
        executor: E,
        name: &str,
        rate: Decimal,
    ) -> Result<TaxClass, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, TaxClass>(
            r#"
            INSERT INTO tax_classes (name, rate)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(rate)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique(e, name))
    }

    pub async fn list_tax_classes<'e, E>(&self, executor: E) -> Result<Vec<TaxClass>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let classes = sqlx::query_as::<_, TaxClass>("SELECT * FROM tax_classes ORDER BY name ASC")
            .fetch_all(executor)
            .await?;
        Ok(classes)
    }

    pub async fn find_tax_class<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<TaxClass>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let found = sqlx::query_as::<_, TaxClass>("SELECT * FROM tax_classes WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(found)
    }

    pub async fn update_tax_class<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
        rate: Option<Decimal>,
    ) -> Result<TaxClass, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, TaxClass>(
            r#"
            UPDATE tax_classes
            SET name = COALESCE($2, name), rate = COALESCE($3, rate), updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(rate)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::EntityNotFound("Classe de imposto"))
    }

    pub async fn delete_tax_class<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM tax_classes WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::EntityNotFound("Classe de imposto"));
        }
        Ok(())
    }

    // ---
    // Unidades de Medida
    // ---

    pub async fn create_measure_unit<'e, E>(
        &self,
        executor: E,
        name: &str,
        symbol: &str,
    ) -> Result<MeasureUnit, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, MeasureUnit>(
            r#"
            INSERT INTO measure_units (name, symbol)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(symbol)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique(e, name))
    }

    pub async fn list_measure_units<'e, E>(&self, executor: E) -> Result<Vec<MeasureUnit>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let units =
            sqlx::query_as::<_, MeasureUnit>("SELECT * FROM measure_units ORDER BY name ASC")
                .fetch_all(executor)
                .await?;
        Ok(units)
    }

    pub async fn find_measure_unit<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<MeasureUnit>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let found = sqlx::query_as::<_, MeasureUnit>("SELECT * FROM measure_units WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(found)
    }

    pub async fn update_measure_unit<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
        symbol: Option<&str>,
    ) -> Result<MeasureUnit, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, MeasureUnit>(
            r#"
            UPDATE measure_units
            SET name = COALESCE($2, name), symbol = COALESCE($3, symbol), updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(symbol)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::EntityNotFound("Unidade de medida"))
    }

    pub async fn delete_measure_unit<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM measure_units WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::EntityNotFound("Unidade de medida"));
        }
        Ok(())
    }

    // ---
    // Listas de Preço
    // ---

    pub async fn create_price_list<'e, E>(
        &self,
        executor: E,
        code: &str,
        name: &str,
        currency: &str,
    ) -> Result<PriceList, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PriceList>(
            r#"
            INSERT INTO price_lists (code, name, currency)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(currency)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique(e, code))
    }

    pub async fn list_price_lists<'e, E>(&self, executor: E) -> Result<Vec<PriceList>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lists = sqlx::query_as::<_, PriceList>("SELECT * FROM price_lists ORDER BY name ASC")
            .fetch_all(executor)
            .await?;
        Ok(lists)
    }

    pub async fn find_price_list<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<PriceList>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let found = sqlx::query_as::<_, PriceList>("SELECT * FROM price_lists WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(found)
    }

    pub async fn update_price_list<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
        currency: Option<&str>,
    ) -> Result<PriceList, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PriceList>(
            r#"
            UPDATE price_lists
            SET name = COALESCE($2, name), currency = COALESCE($3, currency), updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(currency)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::EntityNotFound("Lista de preço"))
    }

    pub async fn delete_price_list<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM price_lists WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::EntityNotFound("Lista de preço"));
        }
        Ok(())
    }
}
