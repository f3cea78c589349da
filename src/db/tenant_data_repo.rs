// src/db/tenant_data_repo.rs

use sqlx::{Executor, PgPool, Postgres, Row};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::tenant_data::{FlagMap, TenantDataRow, TenantDataSpec},
};

// Repositório genérico das tabelas "data" (uma linha por entidade × tenant).
// Todo SQL é montado a partir do TenantDataSpec da entidade: os nomes de
// tabela/coluna são constantes do programa, nunca entrada do usuário.
// Os valores entram sempre como binds.
#[derive(Clone)]
pub struct TenantDataRepository {
    pool: PgPool,
}

impl TenantDataRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn flag_columns(spec: &TenantDataSpec) -> String {
        spec.flags
            .iter()
            .map(|f| f.name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Busca todas as linhas "data" de uma entidade (todos os tenants).
    pub async fn fetch_rows<'e, E>(
        &self,
        executor: E,
        spec: &TenantDataSpec,
        parent_id: Uuid,
    ) -> Result<Vec<TenantDataRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT tenant_id, {} FROM {} WHERE {} = $1",
            Self::flag_columns(spec),
            spec.table,
            spec.parent_column,
        );

        let rows = sqlx::query(&sql).bind(parent_id).fetch_all(executor).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let mut flags = FlagMap::new();
            for f in spec.flags {
                flags.insert(f.name.to_string(), row.try_get::<bool, _>(f.name)?);
            }
            out.push(TenantDataRow {
                tenant_id: row.try_get("tenant_id")?,
                flags,
            });
        }
        Ok(out)
    }

    /// Busca a linha de UM escopo de tenant (ou None, se não existir).
    pub async fn fetch_row<'e, E>(
        &self,
        executor: E,
        spec: &TenantDataSpec,
        parent_id: Uuid,
        tenant_id: Option<Uuid>,
    ) -> Result<Option<TenantDataRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT tenant_id, {} FROM {} WHERE {} = $1 AND tenant_id IS NOT DISTINCT FROM $2",
            Self::flag_columns(spec),
            spec.table,
            spec.parent_column,
        );

        let row = sqlx::query(&sql)
            .bind(parent_id)
            .bind(tenant_id)
            .fetch_optional(executor)
            .await?;

        match row {
            Some(row) => {
                let mut flags = FlagMap::new();
                for f in spec.flags {
                    flags.insert(f.name.to_string(), row.try_get::<bool, _>(f.name)?);
                }
                Ok(Some(TenantDataRow {
                    tenant_id: row.try_get("tenant_id")?,
                    flags,
                }))
            }
            None => Ok(None),
        }
    }

    /// Insere-ou-atualiza a linha de um escopo (UPSERT pelo par (pai, tenant)).
    ///
    /// `effective` precisa conter TODAS as flags do spec (valores efetivos já
    /// calculados); `touched` diz quais delas vieram do chamador — só essas
    /// são sobrescritas quando a linha já existe.
    pub async fn upsert_row<'e, E>(
        &self,
        executor: E,
        spec: &TenantDataSpec,
        parent_id: Uuid,
        tenant_id: Option<Uuid>,
        effective: &FlagMap,
        touched: &[String],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let flag_names: Vec<&str> = spec.flags.iter().map(|f| f.name).collect();

        let columns = flag_names.join(", ");
        let placeholders: Vec<String> = (0..flag_names.len())
            .map(|i| format!("${}", i + 3))
            .collect();

        let on_conflict = if touched.is_empty() {
            "DO NOTHING".to_string()
        } else {
            let sets: Vec<String> = touched
                .iter()
                .map(|name| format!("{name} = EXCLUDED.{name}"))
                .collect();
            format!("DO UPDATE SET {}", sets.join(", "))
        };

        let sql = format!(
            "INSERT INTO {table} ({parent}, tenant_id, {columns}) \
             VALUES ($1, $2, {values}) \
             ON CONFLICT ({parent}, tenant_id) {on_conflict}",
            table = spec.table,
            parent = spec.parent_column,
            columns = columns,
            values = placeholders.join(", "),
        );

        let mut query = sqlx::query(&sql).bind(parent_id).bind(tenant_id);
        for name in &flag_names {
            query = query.bind(effective.get(*name).copied().unwrap_or(false));
        }
        query.execute(executor).await?;
        Ok(())
    }

    /// Efeito colateral das flags únicas por tenant: para cada flag única que
    /// a linha escrita ativa, limpa essa flag em TODAS as outras linhas do
    /// mesmo escopo. Idempotente; deve rodar na mesma transação do upsert.
    pub async fn clear_unique_flags(
        &self,
        conn: &mut sqlx::PgConnection,
        spec: &TenantDataSpec,
        parent_id: Uuid,
        tenant_id: Option<Uuid>,
        effective: &FlagMap,
    ) -> Result<(), AppError> {
        for flag in spec.unique_flags {
            if effective.get(*flag).copied() != Some(true) {
                continue;
            }
            let sql = format!(
                "UPDATE {table} SET {flag} = FALSE \
                 WHERE {flag} = TRUE \
                   AND tenant_id IS NOT DISTINCT FROM $1 \
                   AND {parent} <> $2",
                table = spec.table,
                flag = flag,
                parent = spec.parent_column,
            );
            sqlx::query(&sql)
                .bind(tenant_id)
                .bind(parent_id)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    /// Guarda de remoção: devolve a primeira flag única que está TRUE em
    /// alguma linha da entidade (em qualquer escopo), se houver.
    pub async fn find_set_unique_flag(
        &self,
        conn: &mut sqlx::PgConnection,
        spec: &TenantDataSpec,
        parent_id: Uuid,
    ) -> Result<Option<&'static str>, AppError> {
        for flag in spec.unique_flags {
            let sql = format!(
                "SELECT EXISTS(SELECT 1 FROM {table} WHERE {parent} = $1 AND {flag} = TRUE)",
                table = spec.table,
                parent = spec.parent_column,
                flag = flag,
            );
            let is_set: bool = sqlx::query_scalar(&sql)
                .bind(parent_id)
                .fetch_one(&mut *conn)
                .await?;
            if is_set {
                return Ok(Some(*flag));
            }
        }
        Ok(None)
    }
}
