// src/services/tenant_data_service.rs

use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TenantDataRepository,
    models::tenant_data::{TenantDataInput, TenantDataSpec, TenantFlagsView},
    services::constraint,
};

// O acessor/mutador das entidades com escopo de tenant. Apresenta as flags
// como se fossem atributos da entidade pai, resolvendo para o escopo ativo.
//
// As operações de escrita rodam SEMPRE dentro da transação do chamador
// (que também insere/atualiza a entidade pai): ou tudo entra, ou nada.
#[derive(Clone)]
pub struct TenantDataService {
    repo: TenantDataRepository,
}

impl TenantDataService {
    pub fn new(repo: TenantDataRepository) -> Self {
        Self { repo }
    }

    /// Caminho de leitura: flags resolvidas para um escopo de tenant.
    /// Sem linha, valem os padrões declarados no spec.
    pub async fn resolve_flags(
        &self,
        conn: &mut PgConnection,
        spec: &TenantDataSpec,
        parent_id: Uuid,
        tenant_id: Option<Uuid>,
    ) -> Result<TenantFlagsView, AppError> {
        let row = self.repo.fetch_row(&mut *conn, spec, parent_id, tenant_id).await?;
        let flags = spec.effective(row.as_ref().map(|r| &r.flags), None);
        Ok(TenantFlagsView { tenant_id, flags })
    }

    /// Criação: uma linha por escopo-alvo (todos os tenants conhecidos, ou o
    /// escopo único NULL). Valores efetivos = entrada do chamador sobre os
    /// padrões. Valida TODOS os escopos antes de escrever qualquer linha.
    pub async fn create_rows(
        &self,
        conn: &mut PgConnection,
        spec: &TenantDataSpec,
        parent_id: Uuid,
        input: &[TenantDataInput],
        targets: &[Option<Uuid>],
    ) -> Result<(), AppError> {
        constraint::check_known_flags(spec, input)?;

        let planned: Vec<_> = targets
            .iter()
            .map(|tenant_id| {
                let entry = input.iter().find(|i| i.tenant_id == *tenant_id);
                let effective = spec.effective(None, entry.map(|e| &e.flags));
                (*tenant_id, effective)
            })
            .collect();

        constraint::validate(spec, &planned)?;

        for (tenant_id, effective) in &planned {
            self.repo
                .clear_unique_flags(&mut *conn, spec, parent_id, *tenant_id, effective)
                .await?;
            let all_flags: Vec<String> =
                spec.flags.iter().map(|f| f.name.to_string()).collect();
            self.repo
                .upsert_row(&mut *conn, spec, parent_id, *tenant_id, effective, &all_flags)
                .await?;
        }
        Ok(())
    }

    /// Atualização: upsert apenas dos escopos presentes na entrada; os
    /// demais ficam intocados. A validação roda sobre a linha existente
    /// sobreposta pela entrada (ou os padrões, se a linha ainda não existe).
    pub async fn update_rows(
        &self,
        conn: &mut PgConnection,
        spec: &TenantDataSpec,
        parent_id: Uuid,
        input: &[TenantDataInput],
    ) -> Result<(), AppError> {
        constraint::check_known_flags(spec, input)?;

        let existing = self.repo.fetch_rows(&mut *conn, spec, parent_id).await?;

        let mut planned = Vec::with_capacity(input.len());
        for entry in input {
            let base = existing
                .iter()
                .find(|r| r.tenant_id == entry.tenant_id)
                .map(|r| &r.flags);
            let effective = spec.effective(base, Some(&entry.flags));
            planned.push((entry.tenant_id, effective));
        }

        constraint::validate(spec, &planned)?;

        for (entry, (tenant_id, effective)) in input.iter().zip(&planned) {
            self.repo
                .clear_unique_flags(&mut *conn, spec, parent_id, *tenant_id, effective)
                .await?;
            let touched: Vec<String> = entry.flags.keys().cloned().collect();
            self.repo
                .upsert_row(&mut *conn, spec, parent_id, *tenant_id, effective, &touched)
                .await?;
        }
        Ok(())
    }

    /// Guarda de remoção: uma entidade com flag única ativa (ex: is_default)
    /// em qualquer escopo não pode ser removida.
    pub async fn guard_delete(
        &self,
        conn: &mut PgConnection,
        spec: &TenantDataSpec,
        parent_id: Uuid,
    ) -> Result<(), AppError> {
        if let Some(flag) = self.repo.find_set_unique_flag(&mut *conn, spec, parent_id).await? {
            return Err(AppError::DefaultDeletionForbidden(flag.to_string()));
        }
        Ok(())
    }
}
