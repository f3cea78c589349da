// src/handlers/catalog.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::TenantContext,
    models::tenant_data::TenantDataInput,
};

// ---
// Categorias
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryPayload {
    #[validate(length(min = 1, message = "O código é obrigatório."))]
    pub code: String,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub per_tenant: Vec<TenantDataInput>,
}

#[utoipa::path(
    post,
    path = "/api/catalog/categories",
    request_body = CreateCategoryPayload,
    responses((status = 201, body = crate::models::catalog::Category)),
    tag = "Catalog"
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let category = app_state
        .catalog_service
        .create_category(
            &payload.code,
            &payload.name,
            payload.description.as_deref(),
            payload.parent_id,
            &payload.per_tenant,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/categories",
    responses((status = 200, body = Vec<crate::models::catalog::Category>)),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let categories = app_state.catalog_service.list_categories().await?;
    Ok((StatusCode::OK, Json(categories)))
}

// ---
// Tipos de Produto
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductTypePayload {
    #[validate(length(min = 1, message = "O código é obrigatório."))]
    pub code: String,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[serde(default)]
    pub per_tenant: Vec<TenantDataInput>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductTypePayload {
    pub name: Option<String>,
    #[serde(default)]
    pub per_tenant: Vec<TenantDataInput>,
}

#[utoipa::path(
    post,
    path = "/api/catalog/product-types",
    request_body = CreateProductTypePayload,
    responses((status = 201, body = crate::models::catalog::ProductType)),
    tag = "Catalog"
)]
pub async fn create_product_type(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateProductTypePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product_type = app_state
        .catalog_service
        .create_product_type(&payload.code, &payload.name, &payload.per_tenant)
        .await?;

    Ok((StatusCode::CREATED, Json(product_type)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/product-types",
    responses((status = 200, body = Vec<crate::models::catalog::ProductType>)),
    tag = "Catalog"
)]
pub async fn list_product_types(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let types = app_state.catalog_service.list_product_types().await?;
    Ok((StatusCode::OK, Json(types)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/product-types/{id}",
    responses((status = 200, body = crate::models::tenant_data::WithFlags<crate::models::catalog::ProductType>)),
    tag = "Catalog"
)]
pub async fn get_product_type(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let found = app_state.catalog_service.get_product_type(id, tenant.0).await?;
    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    patch,
    path = "/api/catalog/product-types/{id}",
    request_body = UpdateProductTypePayload,
    responses((status = 200, body = crate::models::catalog::ProductType)),
    tag = "Catalog"
)]
pub async fn update_product_type(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductTypePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let updated = app_state
        .catalog_service
        .update_product_type(id, payload.name.as_deref(), &payload.per_tenant)
        .await?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/catalog/product-types/{id}",
    responses((status = 204)),
    tag = "Catalog"
)]
pub async fn delete_product_type(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_product_type(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Classes de Imposto
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaxClassPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[serde(default)]
    pub rate: Decimal,
    #[serde(default)]
    pub per_tenant: Vec<TenantDataInput>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaxClassPayload {
    pub name: Option<String>,
    pub rate: Option<Decimal>,
    #[serde(default)]
    pub per_tenant: Vec<TenantDataInput>,
}

#[utoipa::path(
    post,
    path = "/api/catalog/tax-classes",
    request_body = CreateTaxClassPayload,
    responses((status = 201, body = crate::models::catalog::TaxClass)),
    tag = "Catalog"
)]
pub async fn create_tax_class(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateTaxClassPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tax_class = app_state
        .catalog_service
        .create_tax_class(&payload.name, payload.rate, &payload.per_tenant)
        .await?;

    Ok((StatusCode::CREATED, Json(tax_class)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/tax-classes",
    responses((status = 200, body = Vec<crate::models::catalog::TaxClass>)),
    tag = "Catalog"
)]
pub async fn list_tax_classes(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let classes = app_state.catalog_service.list_tax_classes().await?;
    Ok((StatusCode::OK, Json(classes)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/tax-classes/{id}",
    responses((status = 200, body = crate::models::tenant_data::WithFlags<crate::models::catalog::TaxClass>)),
    tag = "Catalog"
)]
pub async fn get_tax_class(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let found = app_state.catalog_service.get_tax_class(id, tenant.0).await?;
    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    patch,
    path = "/api/catalog/tax-classes/{id}",
    request_body = UpdateTaxClassPayload,
    responses((status = 200, body = crate::models::catalog::TaxClass)),
    tag = "Catalog"
)]
pub async fn update_tax_class(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaxClassPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let updated = app_state
        .catalog_service
        .update_tax_class(id, payload.name.as_deref(), payload.rate, &payload.per_tenant)
        .await?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/catalog/tax-classes/{id}",
    responses((status = 204)),
    tag = "Catalog"
)]
pub async fn delete_tax_class(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_tax_class(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Unidades de Medida
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeasureUnitPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(length(min = 1, message = "O símbolo é obrigatório."))]
    pub symbol: String,
    #[serde(default)]
    pub per_tenant: Vec<TenantDataInput>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeasureUnitPayload {
    pub name: Option<String>,
    pub symbol: Option<String>,
    #[serde(default)]
    pub per_tenant: Vec<TenantDataInput>,
}

#[utoipa::path(
    post,
    path = "/api/catalog/measure-units",
    request_body = CreateMeasureUnitPayload,
    responses((status = 201, body = crate::models::catalog::MeasureUnit)),
    tag = "Catalog"
)]
pub async fn create_measure_unit(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateMeasureUnitPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let unit = app_state
        .catalog_service
        .create_measure_unit(&payload.name, &payload.symbol, &payload.per_tenant)
        .await?;

    Ok((StatusCode::CREATED, Json(unit)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/measure-units",
    responses((status = 200, body = Vec<crate::models::catalog::MeasureUnit>)),
    tag = "Catalog"
)]
pub async fn list_measure_units(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let units = app_state.catalog_service.list_measure_units().await?;
    Ok((StatusCode::OK, Json(units)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/measure-units/{id}",
    responses((status = 200, body = crate::models::tenant_data::WithFlags<crate::models::catalog::MeasureUnit>)),
    tag = "Catalog"
)]
pub async fn get_measure_unit(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let found = app_state.catalog_service.get_measure_unit(id, tenant.0).await?;
    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    patch,
    path = "/api/catalog/measure-units/{id}",
    request_body = UpdateMeasureUnitPayload,
    responses((status = 200, body = crate::models::catalog::MeasureUnit)),
    tag = "Catalog"
)]
pub async fn update_measure_unit(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMeasureUnitPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let updated = app_state
        .catalog_service
        .update_measure_unit(
            id,
            payload.name.as_deref(),
            payload.symbol.as_deref(),
            &payload.per_tenant,
        )
        .await?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/catalog/measure-units/{id}",
    responses((status = 204)),
    tag = "Catalog"
)]
pub async fn delete_measure_unit(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_measure_unit(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Listas de Preço
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePriceListPayload {
    #[validate(length(min = 1, message = "O código é obrigatório."))]
    pub code: String,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(length(min = 3, max = 3, message = "A moeda deve ter 3 letras."))]
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub per_tenant: Vec<TenantDataInput>,
}

fn default_currency() -> String {
    "BRL".to_string()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePriceListPayload {
    pub name: Option<String>,
    pub currency: Option<String>,
    #[serde(default)]
    pub per_tenant: Vec<TenantDataInput>,
}

#[utoipa::path(
    post,
    path = "/api/catalog/price-lists",
    request_body = CreatePriceListPayload,
    responses((status = 201, body = crate::models::catalog::PriceList)),
    tag = "Catalog"
)]
pub async fn create_price_list(
    State(app_state): State<AppState>,
    Json(payload): Json<CreatePriceListPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let price_list = app_state
        .catalog_service
        .create_price_list(&payload.code, &payload.name, &payload.currency, &payload.per_tenant)
        .await?;

    Ok((StatusCode::CREATED, Json(price_list)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/price-lists",
    responses((status = 200, body = Vec<crate::models::catalog::PriceList>)),
    tag = "Catalog"
)]
pub async fn list_price_lists(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let lists = app_state.catalog_service.list_price_lists().await?;
    Ok((StatusCode::OK, Json(lists)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/price-lists/{id}",
    responses((status = 200, body = crate::models::tenant_data::WithFlags<crate::models::catalog::PriceList>)),
    tag = "Catalog"
)]
pub async fn get_price_list(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let found = app_state.catalog_service.get_price_list(id, tenant.0).await?;
    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    patch,
    path = "/api/catalog/price-lists/{id}",
    request_body = UpdatePriceListPayload,
    responses((status = 200, body = crate::models::catalog::PriceList)),
    tag = "Catalog"
)]
pub async fn update_price_list(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePriceListPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let updated = app_state
        .catalog_service
        .update_price_list(
            id,
            payload.name.as_deref(),
            payload.currency.as_deref(),
            &payload.per_tenant,
        )
        .await?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/catalog/price-lists/{id}",
    responses((status = 204)),
    tag = "Catalog"
)]
pub async fn delete_price_list(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_price_list(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
