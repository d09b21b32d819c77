// src/web/mw_auth.rs
use crate::{error::AppError, services::auth_service, state::AppState};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

/// Identidade autenticada do pedido, guardada nas extensões para os
/// handlers e para o middleware de autorização.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: String,
    pub role: String,
}

// Middleware que exige um cookie de sessão assinado e válido.
// A assinatura é verificada pelo jar (cookie adulterado = cookie ausente);
// o decode valida o formato e o prazo das claims.
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let signed = cookies.signed(&state.session_key);

    let claims = signed
        .get(auth_service::SESSION_COOKIE)
        .and_then(|cookie| auth_service::decode_claims(cookie.value()));

    match claims {
        Some(claims) => {
            tracing::debug!(
                "Autenticação MW: utilizador '{}' ({}) autenticado.",
                claims.uid,
                claims.role
            );
            request.extensions_mut().insert(CurrentUser {
                id: claims.uid,
                role: claims.role,
            });
            Ok(next.run(request).await)
        }
        None => {
            tracing::debug!("Autenticação MW: sem sessão válida. Rejeitando com 401.");
            Err(AppError::SessionInvalid)
        }
    }
}
