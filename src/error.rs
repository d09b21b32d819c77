// src/error.rs
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

// Mapa campo -> mensagem devolvido nas falhas de validação de payload.
pub type FieldErrors = HashMap<String, String>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erro na base de dados: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Erro de migração da base de dados: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Erro de variável de ambiente: {0}")]
    EnvVarError(#[from] std::env::VarError),

    #[error("Erro ao processar password")]
    PasswordHashingError,

    // Usado tanto para email inexistente como para senha errada ou conta
    // desativada: a resposta tem de ser indistinguível nos três casos.
    #[error("Credenciais inválidas")]
    AuthenticationFailed,

    // Pedido a uma rota protegida sem cookie válido (ausente, adulterado
    // ou expirado). Também 401, mas com mensagem própria.
    #[error("Sessão inválida ou em falta")]
    SessionInvalid,

    #[error("Acesso negado")]
    AuthorizationFailed,

    #[error("Dados inválidos")]
    Validation(FieldErrors),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Erro interno inesperado")]
    InternalServerError,
}

impl AppError {
    /// Erro de validação com um único campo em falta/incorreto.
    pub fn field(field: &str, message: &str) -> AppError {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), message.to_string());
        AppError::Validation(errors)
    }

    /// Código estável, legível por máquina, incluído no envelope de erro.
    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Conflict(_) => "CONFLICT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AuthenticationFailed | AppError::SessionInvalid => "AUTHENTICATION_FAILED",
            AppError::AuthorizationFailed => "AUTHORIZATION_FAILED",
            _ => "INTERNAL_ERROR",
        }
    }
}

/// Traduz violações de UNIQUE detetadas pelo SQLite num `Conflict` com a
/// mensagem dada. Qualquer outro erro segue como erro de base de dados.
pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::SqlxError(err),
    }
}

// Como converter AppError numa resposta HTTP (envelope JSON uniforme).
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Loga o erro detalhado no servidor; o cliente só vê a mensagem segura.
        match &self {
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) | AppError::EnvVarError(_) => {
                tracing::error!("Erro processado: {:?}", self);
            }
            _ => tracing::debug!("Erro processado: {:?}", self),
        }

        let (status, message) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "Dados inválidos.".to_string()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::AuthenticationFailed => {
                (StatusCode::UNAUTHORIZED, "Email ou senha inválidos.".to_string())
            }
            AppError::SessionInvalid => {
                (StatusCode::UNAUTHORIZED, "Autenticação necessária.".to_string())
            }
            AppError::AuthorizationFailed => (
                StatusCode::FORBIDDEN,
                "Acesso negado: permissões insuficientes.".to_string(),
            ),
            AppError::PasswordHashingError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erro ao processar credenciais.".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Ocorreu um erro inesperado.".to_string(),
            ),
        };

        let mut error = json!({
            "code": self.code(),
            "message": message,
        });
        if let AppError::Validation(fields) = &self {
            error["details"] = json!(fields);
        }

        let body = json!({
            "success": false,
            "error": error,
        });

        (status, Json(body)).into_response()
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;
