// src/middleware/tenancy.rs

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::config::AppState;

// O nome do nosso cabeçalho HTTP customizado
const TENANT_ID_HEADER: &str = "x-tenant-id";

// O nosso extrator de escopo de tenant.
// Com tenancy ativada, exige o cabeçalho X-Tenant-ID apontando para um
// tenant real e carrega Some(uuid). Com tenancy desativada, o cabeçalho é
// ignorado e o escopo é None (escopo único implícito).
#[derive(Debug, Clone, Copy)]
pub struct TenantContext(pub Option<Uuid>);

pub struct TenantRejection(String);

impl IntoResponse for TenantRejection {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": self.0 }))).into_response()
    }
}

impl FromRequestParts<AppState> for TenantContext {
    type Rejection = TenantRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !state.tenancy_enabled {
            return Ok(TenantContext(None));
        }

        // Tenta ler o cabeçalho X-Tenant-ID
        let header_value = parts.headers.get(TENANT_ID_HEADER);

        match header_value {
            Some(value) => {
                let value_str = value.to_str().map_err(|_| {
                    TenantRejection(
                        "Cabeçalho X-Tenant-ID contém caracteres inválidos.".to_string(),
                    )
                })?;

                let tenant_id = Uuid::parse_str(value_str).map_err(|_| {
                    TenantRejection("Cabeçalho X-Tenant-ID inválido (não é um UUID).".to_string())
                })?;

                state
                    .tenancy_service
                    .ensure_exists(tenant_id)
                    .await
                    .map_err(|_| {
                        TenantRejection("O tenant informado não existe.".to_string())
                    })?;

                Ok(TenantContext(Some(tenant_id)))
            }
            None => Err(TenantRejection(
                "O cabeçalho X-Tenant-ID é obrigatório.".to_string(),
            )),
        }
    }
}
