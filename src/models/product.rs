// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::tenant_data::{FlagDef, TenantDataSpec};

/// O produto do catálogo (dados globais, iguais para todos os tenants).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub product_type_id: Uuid,
    pub measure_unit_id: Option<Uuid>,
    pub tax_class_id: Option<Uuid>,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub const TENANT_DATA: TenantDataSpec = TenantDataSpec {
        table: "product_data",
        parent_column: "product_id",
        flags: &[FlagDef { name: "is_active", default: true }],
        exclusive_sets: &[],
        unique_flags: &[],
    };
}

/// A linha "data" do produto com os escalares por tenant (além das flags):
/// a categoria e o estoque daquele tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductTenantData {
    pub tenant_id: Option<Uuid>,
    pub is_active: bool,
    pub category_id: Option<Uuid>,
    pub stock: Option<Decimal>,
}
