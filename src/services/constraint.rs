// src/services/constraint.rs

// Validação pura das invariantes de flags por tenant. Sem banco: recebe os
// mapas de flags já calculados e devolve TODOS os erros de uma vez (não
// falha no primeiro), para o formulário destacar cada campo ofensor.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::tenant_data::{FlagMap, TenantDataInput, TenantDataSpec},
};

// Chave do erro de campo: "tenantId.flag" com tenancy ativa, só "flag" no
// escopo único.
fn field_key(tenant_id: Option<Uuid>, flag: &str) -> String {
    match tenant_id {
        Some(id) => format!("{id}.{flag}"),
        None => flag.to_string(),
    }
}

/// Rejeita nomes de flag que não existem no spec da entidade.
pub fn check_known_flags(
    spec: &TenantDataSpec,
    input: &[TenantDataInput],
) -> Result<(), AppError> {
    let mut details: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for entry in input {
        for name in entry.flags.keys() {
            if !spec.is_known(name) {
                details
                    .entry(field_key(entry.tenant_id, name))
                    .or_default()
                    .push(format!("Flag desconhecida: '{name}'."));
            }
        }
    }

    if details.is_empty() {
        Ok(())
    } else {
        Err(AppError::FlagConflict(details))
    }
}

/// Valida os conjuntos mutuamente exclusivos sobre os valores EFETIVOS de
/// cada escopo. Varre todos os tenants e todos os conjuntos antes de falhar.
pub fn validate(
    spec: &TenantDataSpec,
    rows: &[(Option<Uuid>, FlagMap)],
) -> Result<(), AppError> {
    let mut details: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (tenant_id, flags) in rows {
        for set in spec.exclusive_sets {
            let active: Vec<&str> = set
                .iter()
                .copied()
                .filter(|name| flags.get(*name).copied() == Some(true))
                .collect();

            if active.len() > 1 {
                // Um erro por flag ativa, para cada campo acender no form.
                let listed = active.join(", ");
                for name in &active {
                    details
                        .entry(field_key(*tenant_id, name))
                        .or_default()
                        .push(format!("Apenas uma das flags ({listed}) pode estar ativa."));
                }
            }
        }
    }

    if details.is_empty() {
        Ok(())
    } else {
        Err(AppError::FlagConflict(details))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tenant_data::FlagDef;

    const SPEC: TenantDataSpec = TenantDataSpec {
        table: "price_list_data",
        parent_column: "price_list_id",
        flags: &[
            FlagDef { name: "is_active", default: true },
            FlagDef { name: "is_default", default: false },
            FlagDef { name: "is_default_purchase", default: false },
        ],
        exclusive_sets: &[&["is_default", "is_default_purchase"]],
        unique_flags: &["is_default", "is_default_purchase"],
    };

    fn flags(pairs: &[(&str, bool)]) -> FlagMap {
        pairs.iter().map(|(n, v)| (n.to_string(), *v)).collect()
    }

    #[test]
    fn aceita_linha_sem_conflito() {
        let rows = vec![(None, flags(&[("is_default", true), ("is_default_purchase", false)]))];
        assert!(validate(&SPEC, &rows).is_ok());
    }

    #[test]
    fn rejeita_par_exclusivo_ativo_junto() {
        let rows = vec![(None, flags(&[("is_default", true), ("is_default_purchase", true)]))];
        let err = validate(&SPEC, &rows).unwrap_err();
        match err {
            AppError::FlagConflict(details) => {
                // Um erro por flag ofensora, chave sem prefixo (escopo único).
                assert!(details.contains_key("is_default"));
                assert!(details.contains_key("is_default_purchase"));
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn acumula_erros_de_todos_os_tenants() {
        let t1 = Uuid::new_v4();
        let t2 = Uuid::new_v4();
        let rows = vec![
            (Some(t1), flags(&[("is_default", true), ("is_default_purchase", true)])),
            (Some(t2), flags(&[("is_default", true), ("is_default_purchase", true)])),
        ];
        let err = validate(&SPEC, &rows).unwrap_err();
        match err {
            AppError::FlagConflict(details) => {
                assert_eq!(details.len(), 4);
                assert!(details.contains_key(&format!("{t1}.is_default")));
                assert!(details.contains_key(&format!("{t2}.is_default_purchase")));
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn conflito_em_um_tenant_nao_contamina_o_outro() {
        let t1 = Uuid::new_v4();
        let t2 = Uuid::new_v4();
        let rows = vec![
            (Some(t1), flags(&[("is_default", true), ("is_default_purchase", true)])),
            (Some(t2), flags(&[("is_default", true)])),
        ];
        let err = validate(&SPEC, &rows).unwrap_err();
        match err {
            AppError::FlagConflict(details) => {
                assert!(details.keys().all(|k| k.starts_with(&t1.to_string())));
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn rejeita_flag_desconhecida_com_chave_do_tenant() {
        let t1 = Uuid::new_v4();
        let input = vec![TenantDataInput {
            tenant_id: Some(t1),
            flags: flags(&[("nao_existe", true)]),
        }];
        let err = check_known_flags(&SPEC, &input).unwrap_err();
        match err {
            AppError::FlagConflict(details) => {
                assert!(details.contains_key(&format!("{t1}.nao_existe")));
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn validacao_e_idempotente() {
        let rows = vec![(None, flags(&[("is_default", true)]))];
        assert!(validate(&SPEC, &rows).is_ok());
        assert!(validate(&SPEC, &rows).is_ok());
    }
}
