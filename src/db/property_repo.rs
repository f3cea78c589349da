// src/db/property_repo.rs

use sqlx::types::Json;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::property::{ColorDescriptor, Property, PropertyValue},
};

#[derive(Clone)]
pub struct PropertyRepository {
    pool: PgPool,
}

impl PropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Propriedades
    // ---

    pub async fn create_property<'e, E>(
        &self,
        executor: E,
        code: &str,
        name: &str,
    ) -> Result<Property, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (code, name)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::CodeAlreadyExists(code.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn list_properties<'e, E>(&self, executor: E) -> Result<Vec<Property>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let properties =
            sqlx::query_as::<_, Property>("SELECT * FROM properties ORDER BY name ASC")
                .fetch_all(executor)
                .await?;
        Ok(properties)
    }

    pub async fn find_property<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Property>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let found = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(found)
    }

    // ---
    // Valores de propriedade
    // ---

    pub async fn create_value<'e, E>(
        &self,
        executor: E,
        property_id: Uuid,
        code: &str,
        value: &str,
        sort: i32,
        info_url: Option<&str>,
        color: &ColorDescriptor,
    ) -> Result<PropertyValue, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PropertyValue>(
            r#"
            INSERT INTO property_values (property_id, code, value, sort, info_url, color)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(property_id)
        .bind(code)
        .bind(value)
        .bind(sort)
        .bind(info_url)
        .bind(Json(color))
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::CodeAlreadyExists(code.to_string());
                }
            }
            e.into()
        })
    }

    /// Lista os valores de uma propriedade na ordem natural (sort, id).
    /// A ordem "agrupada" de exibição é montada em memória pelo service.
    pub async fn list_values<'e, E>(
        &self,
        executor: E,
        property_id: Uuid,
    ) -> Result<Vec<PropertyValue>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let values = sqlx::query_as::<_, PropertyValue>(
            "SELECT * FROM property_values WHERE property_id = $1 ORDER BY sort ASC, id ASC",
        )
        .bind(property_id)
        .fetch_all(executor)
        .await?;
        Ok(values)
    }

    pub async fn find_value<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<PropertyValue>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let found = sqlx::query_as::<_, PropertyValue>("SELECT * FROM property_values WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(found)
    }

    /// Busca com trava de linha, para as operações de grupo/merge que leem
    /// e depois escrevem dentro da mesma transação.
    pub async fn find_value_for_update(
        &self,
        conn: &mut sqlx::PgConnection,
        id: Uuid,
    ) -> Result<Option<PropertyValue>, AppError> {
        let found = sqlx::query_as::<_, PropertyValue>(
            "SELECT * FROM property_values WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;
        Ok(found)
    }

    pub async fn set_group_pointer<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        group_value_id: Option<Uuid>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE property_values SET group_value_id = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(group_value_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn mark_as_group<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE property_values SET is_group = TRUE, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(())
    }

    // ---
    // Merge: reaponta o pivot e apaga a origem
    // ---

    /// Reaponta para o alvo toda referência de produto que aponta para a
    /// origem, exceto onde o alvo já tem aquela referência (deduplicação
    /// contra a chave composta do pivot). Devolve quantas linhas mudaram.
    pub async fn relink_product_refs(
        &self,
        conn: &mut sqlx::PgConnection,
        source_id: Uuid,
        target_id: Uuid,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE product_property_values
            SET property_value_id = $2
            WHERE property_value_id = $1
              AND product_id NOT IN (
                  SELECT product_id FROM product_property_values
                  WHERE property_value_id = $2
              )
            "#,
        )
        .bind(source_id)
        .bind(target_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Remove as referências restantes da origem (as duplicadas, que não
    /// puderam ser reapontadas). Devolve quantas caíram.
    pub async fn drop_source_refs(
        &self,
        conn: &mut sqlx::PgConnection,
        source_id: Uuid,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM product_property_values WHERE property_value_id = $1",
        )
        .bind(source_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Apaga o valor de origem. O FK ON DELETE SET NULL devolve eventuais
    /// membros do grupo apagado ao estado avulso.
    pub async fn delete_value<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM property_values WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::PropertyValueNotFound);
        }
        Ok(())
    }

    /// Códigos já usados na propriedade (para a importação pular duplicatas).
    pub async fn list_value_codes<'e, E>(
        &self,
        executor: E,
        property_id: Uuid,
    ) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let codes: Vec<String> =
            sqlx::query_scalar("SELECT code FROM property_values WHERE property_id = $1")
                .bind(property_id)
                .fetch_all(executor)
                .await?;
        Ok(codes)
    }
}
