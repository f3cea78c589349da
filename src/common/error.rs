use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Conflito de flags por tenant: campo -> mensagens.
    /// A chave é "tenantId.flag" (ou só "flag" quando a tenancy está
    /// desativada), para o formulário destacar todos os campos de uma vez.
    #[error("Conflito de flags por tenant")]
    FlagConflict(BTreeMap<String, Vec<String>>),

    #[error("Tenant não encontrado")]
    TenantNotFound,

    #[error("{0} não encontrado(a)")]
    EntityNotFound(&'static str),

    #[error("Valor de propriedade não encontrado")]
    PropertyValueNotFound,

    #[error("Código já existe: {0}")]
    CodeAlreadyExists(String),

    #[error("Registro marcado como padrão ({0}) não pode ser removido")]
    DefaultDeletionForbidden(String),

    #[error("Operação entre propriedades diferentes não é permitida")]
    CrossPropertyOperation,

    #[error("O alvo do agrupamento já é membro de outro grupo")]
    GroupTargetIsMember,

    #[error("Um valor que é grupo não pode virar membro de outro")]
    GroupValueCannotBeMember,

    #[error("Um valor não pode referenciar a si mesmo")]
    SelfReference,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação de payload.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // Mesmo formato para conflitos de flags: todos os campos
            // ofensores de todos os tenants, de uma vez.
            AppError::FlagConflict(details) => {
                let body = Json(json!({
                    "error": "Combinação de flags inválida.",
                    "details": details,
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }

            AppError::TenantNotFound => (StatusCode::NOT_FOUND, "Tenant não encontrado.".to_string()),
            AppError::EntityNotFound(what) => {
                (StatusCode::NOT_FOUND, format!("{} não encontrado(a).", what))
            }
            AppError::PropertyValueNotFound => {
                (StatusCode::NOT_FOUND, "Valor de propriedade não encontrado.".to_string())
            }
            AppError::CodeAlreadyExists(code) => {
                (StatusCode::CONFLICT, format!("O código '{}' já está em uso.", code))
            }
            AppError::DefaultDeletionForbidden(flag) => (
                StatusCode::CONFLICT,
                format!("O registro está marcado como padrão ({}) e não pode ser removido.", flag),
            ),
            AppError::CrossPropertyOperation => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Os valores pertencem a propriedades diferentes.".to_string(),
            ),
            AppError::GroupTargetIsMember => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "O alvo já é membro de outro grupo (aninhamento não é permitido).".to_string(),
            ),
            AppError::GroupValueCannotBeMember => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Um valor que é grupo não pode ser agrupado sob outro valor.".to_string(),
            ),
            AppError::SelfReference => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Um valor não pode ser agrupado/mesclado nele mesmo.".to_string(),
            ),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
