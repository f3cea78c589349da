// src/handlers/tenancy.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::error::AppError, config::AppState};

// ---
// Payload: CreateTenant
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/tenants",
    request_body = CreateTenantPayload,
    responses((status = 201, body = crate::models::tenancy::Tenant)),
    tag = "Tenancy"
)]
pub async fn create_tenant(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateTenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tenant = app_state
        .tenancy_service
        .create_tenant(&payload.name, payload.description.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(tenant)))
}

#[utoipa::path(
    get,
    path = "/api/tenants",
    responses((status = 200, body = Vec<crate::models::tenancy::Tenant>)),
    tag = "Tenancy"
)]
pub async fn list_tenants(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let tenants = app_state.tenancy_service.list_tenants().await?;
    Ok((StatusCode::OK, Json(tenants)))
}
