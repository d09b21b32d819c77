// tests/common/mod.rs
//
// Harness partilhado dos testes de integração: app real (router + cookies)
// sobre uma base SQLite em memória, pedidos via oneshot.
use academico::{
    services::{auth_service, user_service},
    state::AppState,
    web::routes,
};
use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tower::ServiceExt;
use tower_cookies::{CookieManagerLayer, Key};

pub const ADMIN_EMAIL: &str = "admin@campus.edu";
pub const ADMIN_PASSWORD: &str = "admin-muito-secreto";

// Chave fixa só para testes; em produção vem de SESSION_SECRET.
const TEST_SESSION_SECRET: &[u8] =
    b"0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("opções SQLite")
        .foreign_keys(true);
    // Uma única conexão: a base em memória é por-conexão.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("pool de teste");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrações");
    pool
}

/// App completa com um admin já semeado. Devolve também o pool para os
/// testes que precisam de inspecionar a base diretamente.
pub async fn test_app() -> (Router, SqlitePool) {
    let pool = test_pool().await;
    seed_admin(&pool).await;
    let state = AppState::new(pool.clone(), Key::from(TEST_SESSION_SECRET));
    let app = routes::create_router(state).layer(CookieManagerLayer::new());
    (app, pool)
}

pub async fn seed_admin(pool: &SqlitePool) {
    let password_hash = auth_service::hash_password(ADMIN_PASSWORD)
        .await
        .expect("hash do admin");
    let mut conn = pool.acquire().await.expect("conexão");
    user_service::insert_user(
        &mut *conn,
        &user_service::NewUserRecord {
            email: ADMIN_EMAIL.to_string(),
            password_hash,
            role: "admin".to_string(),
            first_name: "Admin".to_string(),
            last_name: "Geral".to_string(),
            phone: None,
            date_of_birth: None,
            gender: None,
            is_verified: true,
        },
    )
    .await
    .expect("seed do admin");
}

pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request json")
}

/// Anexa o cookie de sessão capturado no login.
pub fn with_session(mut req: Request<Body>, session: &str) -> Request<Body> {
    req.headers_mut()
        .insert(header::COOKIE, session.parse().expect("header cookie"));
    req
}

pub async fn send(app: &Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.expect("resposta do app")
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("corpo da resposta");
    serde_json::from_slice(&bytes).expect("corpo JSON")
}

/// Faz login e devolve o par nome=valor do cookie de sessão.
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let response = send(
        app,
        json_request(
            Method::POST,
            "/api/v1/auth/login",
            serde_json::json!({ "email": email, "password": password }),
        ),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK, "login falhou");
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie do login")
        .to_str()
        .expect("Set-Cookie ASCII");
    set_cookie
        .split(';')
        .next()
        .expect("par nome=valor")
        .to_string()
}

pub async fn login_admin(app: &Router) -> String {
    login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await
}
