// src/handlers/properties.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::property::ColorDescriptor,
    services::property_service::ValueImportRow,
};

// ---
// Propriedades
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyPayload {
    #[validate(length(min = 1, message = "O código é obrigatório."))]
    pub code: String,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
}

#[utoipa::path(
    post,
    path = "/api/properties",
    request_body = CreatePropertyPayload,
    responses((status = 201, body = crate::models::property::Property)),
    tag = "Properties"
)]
pub async fn create_property(
    State(app_state): State<AppState>,
    Json(payload): Json<CreatePropertyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let property = app_state
        .property_service
        .create_property(&payload.code, &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(property)))
}

#[utoipa::path(
    get,
    path = "/api/properties",
    responses((status = 200, body = Vec<crate::models::property::Property>)),
    tag = "Properties"
)]
pub async fn list_properties(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let properties = app_state.property_service.list_properties().await?;
    Ok((StatusCode::OK, Json(properties)))
}

// ---
// Valores
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateValuePayload {
    #[validate(length(min = 1, message = "O código é obrigatório."))]
    pub code: String,
    #[validate(length(min = 1, message = "O valor é obrigatório."))]
    pub value: String,
    #[serde(default)]
    pub sort: i32,
    pub info_url: Option<String>,
    #[serde(default)]
    pub color: ColorDescriptor,
}

#[utoipa::path(
    post,
    path = "/api/properties/{id}/values",
    request_body = CreateValuePayload,
    responses((status = 201, body = crate::models::property::PropertyValue)),
    tag = "Properties"
)]
pub async fn create_value(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateValuePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let value = app_state
        .property_service
        .create_value(
            id,
            &payload.code,
            &payload.value,
            payload.sort,
            payload.info_url.as_deref(),
            &payload.color,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(value)))
}

#[utoipa::path(
    get,
    path = "/api/properties/{id}/values",
    responses((status = 200, body = Vec<crate::models::property::PropertyValue>)),
    tag = "Properties"
)]
pub async fn list_values(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    // Ordem agrupada: cada grupo seguido imediatamente dos seus membros.
    let values = app_state.property_service.list_values_grouped(id).await?;
    Ok((StatusCode::OK, Json(values)))
}

// ---
// Agrupamento e merge
// ---

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TargetValuePayload {
    pub target_id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/property-values/{id}/group",
    request_body = TargetValuePayload,
    responses((status = 200, body = crate::models::property::PropertyValue)),
    tag = "Properties"
)]
pub async fn group_value(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TargetValuePayload>,
) -> Result<impl IntoResponse, AppError> {
    let updated = app_state.property_service.group_into(id, payload.target_id).await?;
    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/property-values/{id}/group",
    responses((status = 200, body = crate::models::property::PropertyValue)),
    tag = "Properties"
)]
pub async fn ungroup_value(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let updated = app_state.property_service.remove_from_group(id).await?;
    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    post,
    path = "/api/property-values/{id}/merge",
    request_body = TargetValuePayload,
    responses((status = 200, body = crate::models::property::MergeSummary)),
    tag = "Properties"
)]
pub async fn merge_value(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TargetValuePayload>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.property_service.merge_into(id, payload.target_id).await?;
    Ok((StatusCode::OK, Json(summary)))
}

// ---
// Importação em lote
// ---

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportValuesPayload {
    pub rows: Vec<ValueImportRow>,
}

#[utoipa::path(
    post,
    path = "/api/properties/{id}/values/import",
    request_body = ImportValuesPayload,
    responses((status = 200, body = crate::models::property::ImportSummary)),
    tag = "Properties"
)]
pub async fn import_values(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ImportValuesPayload>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.property_service.import_values(id, &payload.rows).await?;
    Ok((StatusCode::OK, Json(summary)))
}
