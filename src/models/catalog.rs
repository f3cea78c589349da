// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::tenant_data::{FlagDef, TenantDataSpec};

// ---
// 1. Categorias
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub const TENANT_DATA: TenantDataSpec = TenantDataSpec {
        table: "category_data",
        parent_column: "category_id",
        flags: &[FlagDef { name: "is_active", default: true }],
        exclusive_sets: &[],
        unique_flags: &[],
    };
}

// ---
// 2. Tipos de Produto
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductType {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductType {
    pub const TENANT_DATA: TenantDataSpec = TenantDataSpec {
        table: "product_type_data",
        parent_column: "product_type_id",
        flags: &[
            FlagDef { name: "is_active", default: true },
            FlagDef { name: "is_default", default: false },
        ],
        exclusive_sets: &[],
        unique_flags: &["is_default"],
    };
}

// ---
// 3. Classes de Imposto
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxClass {
    pub id: Uuid,
    pub name: String,
    pub rate: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaxClass {
    pub const TENANT_DATA: TenantDataSpec = TenantDataSpec {
        table: "tax_class_data",
        parent_column: "tax_class_id",
        flags: &[
            FlagDef { name: "is_active", default: true },
            FlagDef { name: "is_default", default: false },
        ],
        exclusive_sets: &[],
        unique_flags: &["is_default"],
    };
}

// ---
// 4. Unidades de Medida
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeasureUnit {
    pub id: Uuid,
    pub name: String,
    pub symbol: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MeasureUnit {
    pub const TENANT_DATA: TenantDataSpec = TenantDataSpec {
        table: "measure_unit_data",
        parent_column: "measure_unit_id",
        flags: &[
            FlagDef { name: "is_active", default: true },
            FlagDef { name: "is_default", default: false },
        ],
        exclusive_sets: &[],
        unique_flags: &["is_default"],
    };
}

// ---
// 5. Listas de Preço
// ---
// Uma lista não pode ser padrão de venda E de compra ao mesmo tempo
// (conjunto mutuamente exclusivo); cada padrão é único por tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceList {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PriceList {
    pub const TENANT_DATA: TenantDataSpec = TenantDataSpec {
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
}
