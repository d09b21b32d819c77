// src/web/auth_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{LoginPayload, RegisterPayload, UserPublic},
    services::{auth_service, user_service},
    state::AppState,
    web::{envelope, extract::Json, mw_auth::CurrentUser},
};
use axum::{extract::State, response::Response, Extension};
use tower_cookies::{
    cookie::{time, SameSite},
    Cookie, Cookies,
};

/// Monta o cookie de sessão com os atributos certos. A escrita e a remoção
/// têm de usar o mesmo nome e path, senão o browser guarda dois cookies.
fn session_cookie(value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(auth_service::SESSION_COOKIE, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginPayload>,
) -> AppResult<Response> {
    tracing::info!("Tentativa de login...");

    // 1. Valida as credenciais (erro único para qualquer falha).
    let user = auth_service::authenticate(&state.db_pool, &payload.email, &payload.password).await?;

    // 2. Emite as claims e grava-as no cookie assinado.
    let claims = auth_service::issue_claims(&user);
    let value = serde_json::to_string(&claims).map_err(|e| {
        tracing::error!("Falha ao serializar claims de sessão: {:?}", e);
        AppError::InternalServerError
    })?;
    let mut cookie = session_cookie(value);
    cookie.set_max_age(time::Duration::hours(auth_service::SESSION_TTL_HOURS));
    cookies.signed(&state.session_key).add(cookie);

    // 3. Regista o last_login (falha aqui não impede o login).
    user_service::update_last_login(&state.db_pool, &user.id).await;

    tracing::info!("✅ Login de '{}' efetuado.", user.id);
    Ok(envelope::ok(
        UserPublic::from(user),
        "Login efetuado com sucesso.",
    ))
}

// POST /api/v1/auth/logout
pub async fn handle_logout(State(state): State<AppState>, cookies: Cookies) -> AppResult<Response> {
    tracing::info!("🚪 Logout: removendo cookie de sessão.");
    cookies
        .signed(&state.session_key)
        .remove(session_cookie(String::new()));
    Ok(envelope::message_only("Sessão terminada."))
}

// POST /api/v1/auth/register — auto-registo público (role 'student').
pub async fn handle_register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> AppResult<Response> {
    let registration = payload.validate()?;
    let user = user_service::register_user(&state.db_pool, &registration).await?;
    Ok(envelope::created(user, "Registo efetuado com sucesso."))
}

// GET /api/v1/auth/me — perfil do utilizador da sessão atual.
pub async fn handle_me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Response> {
    let user = user_service::find_user_by_id(&state.db_pool, &current.id)
        .await?
        // Sessão assinada mas utilizador entretanto removido.
        .ok_or(AppError::SessionInvalid)?;
    Ok(envelope::ok(UserPublic::from(user), "Perfil da sessão atual."))
}
