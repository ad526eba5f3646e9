// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

// Tipo de erro único da aplicação, com `thiserror` para a ergonomia do `?`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Consulta inválida: {0}")]
    InvalidQuery(String),

    #[error("Sessão de dashboard não encontrada: {0}")]
    SessionNotFound(Uuid),

    // A fonte remota de registros falhou (rede, backend fora do ar, etc.)
    #[error("Fonte de dados indisponível: {0}")]
    SourceUnavailable(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    /// Mensagem legível que o dashboard mostra no painel de erro.
    pub fn user_message(&self) -> String {
        match self {
            AppError::DatabaseError(e) => format!("Failed to fetch data: {}", e),
            AppError::SourceUnavailable(msg) => format!("Failed to fetch data: {}", msg),
            AppError::InternalServerError(_) => "Failed to fetch data".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more parameters are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidQuery(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Dashboard session {} not found.", id),
            ),
            AppError::SourceUnavailable(ref msg) => {
                tracing::error!("🔥 Fonte de dados indisponível: {}", msg);
                (StatusCode::BAD_GATEWAY, "The sales data source is unavailable.".to_string())
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred.".to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
