// src/services/user_service.rs
use crate::{
    error::{conflict_on_unique, AppError, AppResult},
    models::user::{NewRegistration, User, UserProfilePatch, UserPublic},
    services::auth_service,
};
use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, password_hash, role, first_name, last_name, phone, \
     date_of_birth, gender, is_active, is_verified, last_login, created_at, updated_at";

/// Registo interno para inserir um utilizador já com o hash calculado.
/// Usado diretamente pelo registo e pelos serviços de Student/Faculty
/// (que inserem o User dentro da mesma transação do registo académico).
#[derive(Debug)]
pub struct NewUserRecord {
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub is_verified: bool,
}

/// Busca um utilizador pelo email (já normalizado para minúsculas).
pub async fn find_user_by_email(pool: &SqlitePool, email: &str) -> AppResult<Option<User>> {
    tracing::debug!("Buscando utilizador por email...");
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Busca um utilizador pelo seu ID interno.
pub async fn find_user_by_id(pool: &SqlitePool, user_id: &str) -> AppResult<Option<User>> {
    tracing::debug!("Buscando utilizador por ID: {}", user_id);
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Insere um utilizador. Executa no executor recebido, para que os serviços
/// de Student/Faculty consigam correr a inserção dentro da transação deles.
/// Email duplicado vira Conflict; a unicidade vem do índice, nunca de um
/// check-then-insert.
pub async fn insert_user(conn: &mut SqliteConnection, record: &NewUserRecord) -> AppResult<String> {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, role, first_name, last_name,
                           phone, date_of_birth, gender, is_active, is_verified)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?)
        "#,
    )
    .bind(&id)
    .bind(&record.email)
    .bind(&record.password_hash)
    .bind(&record.role)
    .bind(&record.first_name)
    .bind(&record.last_name)
    .bind(&record.phone)
    .bind(record.date_of_birth)
    .bind(&record.gender)
    .bind(record.is_verified)
    .execute(conn)
    .await
    .map_err(|e| conflict_on_unique(e, "Já existe um utilizador com este email."))?;

    Ok(id)
}

/// Auto-registo público: cria sempre um 'student' não verificado.
pub async fn register_user(pool: &SqlitePool, reg: &NewRegistration) -> AppResult<UserPublic> {
    tracing::info!("Registando novo utilizador...");
    let password_hash = auth_service::hash_password(&reg.password).await?;

    let mut conn = pool.acquire().await?;
    let id = insert_user(
        &mut *conn,
        &NewUserRecord {
            email: reg.email.clone(),
            password_hash,
            role: "student".to_string(),
            first_name: reg.first_name.clone(),
            last_name: reg.last_name.clone(),
            phone: None,
            date_of_birth: None,
            gender: None,
            is_verified: false,
        },
    )
    .await?;
    drop(conn);

    let user = find_user_by_id(pool, &id)
        .await?
        .ok_or(AppError::InternalServerError)?;
    tracing::info!("✅ Utilizador '{}' registado.", user.id);
    Ok(user.into())
}

/// Aplica o sub-patch de perfil ao User ligado a um Student/Faculty.
/// Corre no executor do chamador para ficar na mesma transação que o
/// update do registo académico.
pub async fn apply_profile_patch(
    conn: &mut SqliteConnection,
    user_id: &str,
    patch: &UserProfilePatch,
) -> AppResult<()> {
    if patch.is_empty() {
        return Ok(());
    }
    tracing::debug!("Propagando patch de perfil para user '{}'", user_id);

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("UPDATE users SET updated_at = datetime('now')");
    if let Some(v) = &patch.first_name {
        qb.push(", first_name = ").push_bind(v.clone());
    }
    if let Some(v) = &patch.last_name {
        qb.push(", last_name = ").push_bind(v.clone());
    }
    if let Some(v) = &patch.phone {
        qb.push(", phone = ").push_bind(v.clone());
    }
    if let Some(v) = patch.date_of_birth {
        qb.push(", date_of_birth = ").push_bind(v);
    }
    qb.push(" WHERE id = ").push_bind(user_id.to_string());
    qb.build().execute(conn).await?;

    Ok(())
}

/// Liga ou desliga a flag is_active do utilizador. É o mecanismo do
/// soft-delete: o registo académico ligado nunca é tocado.
pub async fn set_user_active(pool: &SqlitePool, user_id: &str, active: bool) -> AppResult<()> {
    let rows_affected = sqlx::query(
        "UPDATE users SET is_active = ?, updated_at = datetime('now') WHERE id = ?",
    )
    .bind(active)
    .bind(user_id)
    .execute(pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("set_user_active: utilizador '{}' não encontrado.", user_id);
        return Err(AppError::NotFound("Utilizador não encontrado.".to_string()));
    }
    tracing::info!(
        "✅ Utilizador '{}' {}.",
        user_id,
        if active { "reativado" } else { "desativado" }
    );
    Ok(())
}

/// Regista o último login. Falha aqui não impede o login em si.
pub async fn update_last_login(pool: &SqlitePool, user_id: &str) {
    let result = sqlx::query("UPDATE users SET last_login = datetime('now') WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await;
    if let Err(e) = result {
        tracing::warn!("Falha ao registar last_login de '{}': {:?}", user_id, e);
    }
}
