// src/state.rs
use sqlx::SqlitePool;
use tower_cookies::Key;

// Estado partilhado por todos os handlers: pool da DB e a chave que assina
// os cookies de sessão. Nenhum outro estado mutável atravessa requisições.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub session_key: Key,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, session_key: Key) -> Self {
        Self { db_pool, session_key }
    }
}

// Permite extrair o pool da DB diretamente
impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}

impl axum::extract::FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.session_key.clone()
    }
}
