// src/services/auth_service.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{SessionClaims, User},
    services::user_service,
};
use chrono::Utc;
use sqlx::SqlitePool;

// Nome do cookie de sessão assinado e janela de validade das claims.
pub const SESSION_COOKIE: &str = "academico_session";
pub const SESSION_TTL_HOURS: i64 = 24;

/// Verifica se a senha fornecida corresponde ao hash guardado.
/// bcrypt é CPU-bound: corre sempre em spawn_blocking para não ocupar o
/// event loop enquanto outros pedidos esperam.
pub async fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Verificando hash bcrypt...");
        bcrypt::verify(&password, &stored_hash)
    })
    .await
    .map_err(|e| {
        tracing::error!("Erro na task spawn_blocking (verify_password): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("Erro bcrypt ao verificar senha: {:?}", e);
        AppError::PasswordHashingError
    })
}

/// Gera um hash bcrypt para uma senha.
pub async fn hash_password(password: &str) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Gerando hash bcrypt...");
        bcrypt::hash(&password, bcrypt::DEFAULT_COST)
    })
    .await
    .map_err(|e| {
        tracing::error!("Erro na task spawn_blocking (hash_password): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("Erro bcrypt ao gerar hash: {:?}", e);
        AppError::PasswordHashingError
    })
}

/// Valida as credenciais e devolve o User correspondente.
///
/// Email inexistente, senha errada e conta desativada produzem exatamente o
/// mesmo `AuthenticationFailed`, para não permitir enumeração de utilizadores.
pub async fn authenticate(pool: &SqlitePool, email: &str, password: &str) -> AppResult<User> {
    let email = email.trim().to_lowercase();

    let user = match user_service::find_user_by_email(pool, &email).await? {
        Some(user) => user,
        None => {
            tracing::debug!("Login falhou: email desconhecido.");
            return Err(AppError::AuthenticationFailed);
        }
    };

    if !verify_password(password, &user.password_hash).await? {
        tracing::debug!("Login falhou: senha incorreta para '{}'.", user.id);
        return Err(AppError::AuthenticationFailed);
    }

    if !user.is_active {
        tracing::debug!("Login falhou: conta '{}' desativada.", user.id);
        return Err(AppError::AuthenticationFailed);
    }

    Ok(user)
}

/// Constrói as claims da sessão para um utilizador autenticado.
pub fn issue_claims(user: &User) -> SessionClaims {
    SessionClaims {
        uid: user.id.clone(),
        role: user.role.clone(),
        exp: (Utc::now() + chrono::Duration::hours(SESSION_TTL_HOURS)).timestamp(),
    }
}

/// Decodifica e valida as claims extraídas de um cookie assinado.
/// A assinatura já foi verificada pelo jar; aqui resta o formato e o prazo.
pub fn decode_claims(raw: &str) -> Option<SessionClaims> {
    let claims: SessionClaims = serde_json::from_str(raw).ok()?;
    if claims.is_expired() {
        tracing::debug!("Sessão expirada para '{}'.", claims.uid);
        return None;
    }
    Some(claims)
}
