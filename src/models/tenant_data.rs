// src/models/tenant_data.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Mapa de flags por nome. BTreeMap para ordem estável na serialização.
pub type FlagMap = BTreeMap<String, bool>;

/// Uma flag booleana da tabela "data" da entidade, com seu valor padrão
/// (o valor que vale para um tenant sem linha própria).
#[derive(Debug, Clone, Copy)]
pub struct FlagDef {
    pub name: &'static str,
    pub default: bool,
}

/// Configuração estática da tabela "data" de uma entidade: onde mora,
/// quais flags tem e quais regras valem entre elas. Cada entidade declara
/// a sua como `const TENANT_DATA`, então nada aqui vem de entrada do
/// usuário.
#[derive(Debug, Clone, Copy)]
pub struct TenantDataSpec {
    pub table: &'static str,
    pub parent_column: &'static str,
    pub flags: &'static [FlagDef],
    /// Conjuntos em que no máximo UMA flag pode estar ativa por escopo.
    pub exclusive_sets: &'static [&'static [&'static str]],
    /// Flags que só podem estar ativas em UMA entidade por escopo de tenant
    /// (ativar aqui desativa nas demais).
    pub unique_flags: &'static [&'static str],
}

impl TenantDataSpec {
    pub fn flag(&self, name: &str) -> Option<&FlagDef> {
        self.flags.iter().find(|f| f.name == name)
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.flag(name).is_some()
    }

    /// Os valores que valem na ausência de qualquer linha "data".
    pub fn defaults(&self) -> FlagMap {
        self.flags
            .iter()
            .map(|f| (f.name.to_string(), f.default))
            .collect()
    }

    /// Valores efetivos de um escopo: padrões, sobrepostos pela linha
    /// existente (se houver), sobrepostos pela entrada do chamador (se
    /// houver). Flags fora do spec são ignoradas nas duas camadas.
    pub fn effective(&self, base: Option<&FlagMap>, input: Option<&FlagMap>) -> FlagMap {
        let mut out = self.defaults();
        for layer in [base, input].into_iter().flatten() {
            for (name, value) in layer {
                if let Some(slot) = out.get_mut(name.as_str()) {
                    *slot = *value;
                }
            }
        }
        out
    }
}

/// Uma linha da tabela "data": o estado das flags de UMA entidade em UM
/// escopo de tenant (`None` = escopo único, tenancy desativada).
#[derive(Debug, Clone)]
pub struct TenantDataRow {
    pub tenant_id: Option<Uuid>,
    pub flags: FlagMap,
}

/// Bloco por tenant dos payloads de escrita.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantDataInput {
    pub tenant_id: Option<Uuid>,
    #[serde(default)]
    pub flags: FlagMap,
}

/// Flags resolvidas para o escopo ativo, como o cliente as vê.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantFlagsView {
    pub tenant_id: Option<Uuid>,
    pub flags: FlagMap,
}

impl TenantFlagsView {
    /// Flag fora do spec resolve como `false`, nunca como erro de leitura.
    pub fn get(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }
}

/// Entidade pai acompanhada das flags do escopo ativo.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithFlags<T> {
    pub entity: T,
    pub flags: TenantFlagsView,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: TenantDataSpec = TenantDataSpec {
        table: "product_type_data",
        parent_column: "product_type_id",
        flags: &[
            FlagDef { name: "is_active", default: true },
            FlagDef { name: "is_default", default: false },
        ],
        exclusive_sets: &[],
        unique_flags: &["is_default"],
    };

    fn flags(pairs: &[(&str, bool)]) -> FlagMap {
        pairs.iter().map(|(n, v)| (n.to_string(), *v)).collect()
    }

    #[test]
    fn padroes_por_flag() {
        let defaults = SPEC.defaults();
        assert_eq!(defaults.get("is_active"), Some(&true));
        assert_eq!(defaults.get("is_default"), Some(&false));
    }

    #[test]
    fn efetivo_sem_linha_usa_padrao() {
        let effective = SPEC.effective(None, None);
        assert_eq!(effective, SPEC.defaults());
    }

    #[test]
    fn efetivo_preserva_base_quando_flag_ausente() {
        let base = flags(&[("is_active", false), ("is_default", true)]);
        let input = flags(&[("is_active", true)]);
        let effective = SPEC.effective(Some(&base), Some(&input));
        assert_eq!(effective.get("is_active"), Some(&true));
        // is_default não veio na entrada: fica como estava na linha.
        assert_eq!(effective.get("is_default"), Some(&true));
    }

    #[test]
    fn efetivo_ignora_flag_desconhecida() {
        let input = flags(&[("nao_existe", true)]);
        let effective = SPEC.effective(None, Some(&input));
        assert!(!effective.contains_key("nao_existe"));
        assert_eq!(effective.len(), SPEC.flags.len());
    }

    #[test]
    fn view_resolve_flag_fora_do_spec_como_false() {
        let view = TenantFlagsView { tenant_id: None, flags: SPEC.defaults() };
        assert!(view.get("is_active"));
        assert!(!view.get("nao_existe"));
    }
}
