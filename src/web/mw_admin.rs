// src/web/mw_admin.rs
use crate::{error::AppError, web::mw_auth::CurrentUser};
use axum::{extract::Request, http::Method, middleware::Next, response::Response};

/// Middleware de autorização dos routers de entidades: leituras passam
/// para qualquer utilizador autenticado, escritas (POST/PUT/DELETE)
/// exigem o papel 'admin'. Corre sempre depois do require_auth, que é
/// quem coloca o CurrentUser nas extensões.
pub async fn require_admin_mutation(request: Request, next: Next) -> Result<Response, AppError> {
    if matches!(
        *request.method(),
        Method::GET | Method::HEAD | Method::OPTIONS
    ) {
        return Ok(next.run(request).await);
    }
    let method = request.method().clone();

    let Some(current) = request.extensions().get::<CurrentUser>().cloned() else {
        // Router montado sem require_auth antes; trata como não autenticado.
        tracing::warn!("Autorização MW: pedido de escrita sem identidade nas extensões.");
        return Err(AppError::SessionInvalid);
    };

    if !current.role.eq_ignore_ascii_case("admin") {
        tracing::debug!(
            "Autorização MW: utilizador '{}' ({}) tentou {} sem permissão.",
            current.id,
            current.role,
            method
        );
        return Err(AppError::AuthorizationFailed);
    }

    Ok(next.run(request).await)
}
