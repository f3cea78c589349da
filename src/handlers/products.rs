// src/handlers/products.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::TenantContext,
    models::{
        product::ProductTenantData,
        tenant_data::{TenantDataInput, TenantFlagsView},
    },
    services::product_service::ProductTenantInput,
};

/// Bloco por tenant do payload de produto: flags + escalares do escopo.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductTenantPayload {
    pub tenant_id: Option<Uuid>,
    #[serde(default)]
    pub flags: std::collections::BTreeMap<String, bool>,
    pub category_id: Option<Uuid>,
    pub stock: Option<Decimal>,
}

impl ProductTenantPayload {
    fn into_input(self) -> ProductTenantInput {
        ProductTenantInput {
            data: TenantDataInput { tenant_id: self.tenant_id, flags: self.flags },
            category_id: self.category_id,
            stock: self.stock,
        }
    }
}

// ---
// Payload: CreateProduct
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    pub product_type_id: Uuid,
    pub measure_unit_id: Option<Uuid>,
    pub tax_class_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O SKU é obrigatório."))]
    pub sku: String,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub description: Option<String>,

    #[serde(default)]
    pub per_tenant: Vec<ProductTenantPayload>,
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductPayload,
    responses((status = 201, body = crate::models::product::Product)),
    tag = "Products"
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let per_tenant: Vec<ProductTenantInput> =
        payload.per_tenant.into_iter().map(|p| p.into_input()).collect();

    let product = app_state
        .product_service
        .create_product(
            payload.product_type_id,
            payload.measure_unit_id,
            payload.tax_class_id,
            &payload.sku,
            &payload.name,
            payload.description.as_deref(),
            &per_tenant,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/api/products",
    responses((status = 200, body = Vec<crate::models::product::Product>)),
    tag = "Products"
)]
pub async fn list_products(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.product_service.list_products().await?;
    Ok((StatusCode::OK, Json(products)))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    responses((status = 200, body = crate::models::tenant_data::WithFlags<crate::models::product::Product>)),
    tag = "Products"
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let found = app_state.product_service.get_product(id, tenant.0).await?;
    Ok((StatusCode::OK, Json(found)))
}

/// Resposta do detalhe por tenant: flags resolvidas + escalares do escopo.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductTenantDataResponse {
    pub flags: TenantFlagsView,
    pub data: Option<ProductTenantData>,
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/tenant-data",
    responses((status = 200, body = ProductTenantDataResponse)),
    tag = "Products"
)]
pub async fn get_product_tenant_data(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (flags, data) = app_state.product_service.get_tenant_data(id, tenant.0).await?;
    Ok((StatusCode::OK, Json(ProductTenantDataResponse { flags, data })))
}

// ---
// Payload: UpdateProduct
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub per_tenant: Vec<ProductTenantPayload>,
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    request_body = UpdateProductPayload,
    responses((status = 200, body = crate::models::product::Product)),
    tag = "Products"
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let per_tenant: Vec<ProductTenantInput> =
        payload.per_tenant.into_iter().map(|p| p.into_input()).collect();

    let product = app_state
        .product_service
        .update_product(id, payload.name.as_deref(), payload.description.as_deref(), &per_tenant)
        .await?;

    Ok((StatusCode::OK, Json(product)))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    responses((status = 204)),
    tag = "Products"
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.product_service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Payload: SetPropertyValues
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetPropertyValuesPayload {
    pub value_ids: Vec<Uuid>,
}

#[utoipa::path(
    put,
    path = "/api/products/{id}/property-values",
    request_body = SetPropertyValuesPayload,
    responses((status = 200, body = Vec<Uuid>)),
    tag = "Products"
)]
pub async fn set_property_values(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetPropertyValuesPayload>,
) -> Result<impl IntoResponse, AppError> {
    let current = app_state
        .product_service
        .set_property_values(id, &payload.value_ids)
        .await?;
    Ok((StatusCode::OK, Json(current)))
}
