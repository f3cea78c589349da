// src/models/property.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Uma propriedade/atributo do catálogo (ex: "cor", "material").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// Descritor de cor
// ---
// Guardado como JSONB na coluna `color` de property_values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColorDescriptor {
    None,
    Solid { color: String },
    Gradient { from: String, to: String },
    Multicolor { colors: Vec<String> },
}

impl Default for ColorDescriptor {
    fn default() -> Self {
        ColorDescriptor::None
    }
}

/// Um valor de propriedade.
///
/// `group_value_id` é a auto-referência de UM nível do agrupamento:
/// membro -> valor-grupo. Um valor-grupo nunca aponta para outro grupo
/// (a operação de agrupar rejeita alvo que já é membro).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyValue {
    pub id: Uuid,
    pub property_id: Uuid,
    pub code: String,
    pub value: String,
    pub sort: i32,
    pub info_url: Option<String>,
    #[schema(value_type = ColorDescriptor)]
    pub color: Json<ColorDescriptor>,
    pub is_group: bool,
    pub group_value_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Resumo devolvido pelo merge de valores: quantas referências de produto
/// foram reapontadas (duplicatas descartadas inclusas) e quantas linhas
/// foram apagadas (sempre 1: o valor de origem).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MergeSummary {
    pub relinked: u64,
    pub deleted: u64,
}

/// Resumo da importação em lote de valores.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub inserted: u64,
    pub skipped: u64,
    pub errored: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodifica_descritor_gradiente() {
        let raw = r##"{"type":"gradient","from":"#102030","to":"#a0b0c0"}"##;
        let color: ColorDescriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(
            color,
            ColorDescriptor::Gradient { from: "#102030".into(), to: "#a0b0c0".into() }
        );
    }

    #[test]
    fn descritor_padrao_e_none() {
        assert_eq!(ColorDescriptor::default(), ColorDescriptor::None);
        let raw = serde_json::to_value(ColorDescriptor::None).unwrap();
        assert_eq!(raw, serde_json::json!({"type": "none"}));
    }
}
