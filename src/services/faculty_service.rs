// src/services/faculty_service.rs
use crate::{
    error::{conflict_on_unique, AppError, AppResult},
    models::faculty::{FacultyDetail, NewFaculty, UpdateFacultyPayload},
    models::ListParams,
    services::{auth_service, department_service, user_service},
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

const FACULTY_SELECT: &str = "SELECT f.id, f.user_id, f.employee_id, f.joining_date, \
     f.designation, f.department_id, f.status, f.created_at, f.updated_at, \
     u.email, u.first_name, u.last_name, u.phone, u.is_active, \
     d.name AS department_name \
     FROM faculty f \
     JOIN users u ON u.id = f.user_id \
     JOIN departments d ON d.id = f.department_id";

const CONFLICT_MSG: &str = "Já existe um docente com este ID de funcionário.";

pub async fn faculty_exists(pool: &SqlitePool, id: &str) -> AppResult<bool> {
    let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM faculty WHERE id = ?)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(found)
}

/// Busca por ID interno ou, em alternativa, pelo ID de funcionário.
pub async fn find_faculty(pool: &SqlitePool, ident: &str) -> AppResult<FacultyDetail> {
    tracing::debug!("Buscando docente '{}'", ident);
    sqlx::query_as::<_, FacultyDetail>(&format!(
        "{FACULTY_SELECT} WHERE f.id = ? OR f.employee_id = ? LIMIT 1"
    ))
    .bind(ident)
    .bind(ident)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Docente não encontrado.".to_string()))
}

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Sqlite>, params: &ListParams) {
    if let Some(dep) = &params.department_id {
        qb.push(" AND f.department_id = ").push_bind(dep.clone());
    }
    if let Some(status) = &params.status {
        qb.push(" AND f.status = ").push_bind(status.clone());
    }
    if let Some(pattern) = params.search_pattern() {
        qb.push(" AND (LOWER(f.employee_id) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR LOWER(f.designation) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR LOWER(u.first_name) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR LOWER(u.last_name) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR LOWER(u.email) LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

pub async fn list_faculty(
    pool: &SqlitePool,
    params: &ListParams,
) -> AppResult<(Vec<FacultyDetail>, i64)> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(FACULTY_SELECT);
    qb.push(" WHERE 1=1");
    push_filters(&mut qb, params);
    qb.push(" ORDER BY f.created_at DESC, f.id DESC LIMIT ")
        .push_bind(params.limit())
        .push(" OFFSET ")
        .push_bind(params.offset());
    let rows = qb.build_query_as::<FacultyDetail>().fetch_all(pool).await?;

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT COUNT(*) FROM faculty f JOIN users u ON u.id = f.user_id WHERE 1=1",
    );
    push_filters(&mut qb, params);
    let total: i64 = qb.build_query_scalar().fetch_one(pool).await?;

    Ok((rows, total))
}

/// Cria o User e o Faculty numa única transação (mesmo desenho do Student).
pub async fn create_faculty(pool: &SqlitePool, new: NewFaculty) -> AppResult<FacultyDetail> {
    tracing::info!("Criando docente '{}'...", new.employee_id);

    if !department_service::department_exists(pool, &new.department_id).await? {
        return Err(AppError::field("departmentId", "Departamento não encontrado."));
    }

    let password_hash = auth_service::hash_password(&new.password).await?;

    let mut tx = pool.begin().await?;

    let user_id = user_service::insert_user(
        &mut *tx,
        &user_service::NewUserRecord {
            email: new.email.clone(),
            password_hash,
            role: "faculty".to_string(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            phone: new.phone.clone(),
            date_of_birth: new.date_of_birth,
            gender: new.gender.clone(),
            is_verified: true,
        },
    )
    .await?;

    let faculty_id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO faculty (id, user_id, employee_id, joining_date, designation, department_id)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&faculty_id)
    .bind(&user_id)
    .bind(&new.employee_id)
    .bind(new.joining_date)
    .bind(&new.designation)
    .bind(&new.department_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| conflict_on_unique(e, CONFLICT_MSG))?;

    tx.commit().await?;
    tracing::info!("✅ Docente '{}' criado.", new.employee_id);

    find_faculty(pool, &faculty_id).await
}

/// Update parcial com propagação dos campos de perfil para o User ligado,
/// tudo na mesma transação.
pub async fn update_faculty(
    pool: &SqlitePool,
    ident: &str,
    patch: UpdateFacultyPayload,
) -> AppResult<FacultyDetail> {
    let existing = find_faculty(pool, ident).await?;

    if let Some(dep) = &patch.department_id {
        if !department_service::department_exists(pool, dep).await? {
            return Err(AppError::field("departmentId", "Departamento não encontrado."));
        }
    }

    tracing::info!("Atualizando docente '{}'", existing.id);
    let mut tx = pool.begin().await?;

    user_service::apply_profile_patch(&mut *tx, &existing.user_id, &patch.user_patch()).await?;

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("UPDATE faculty SET updated_at = datetime('now')");
    if let Some(v) = &patch.designation {
        qb.push(", designation = ").push_bind(v.clone());
    }
    if let Some(v) = &patch.department_id {
        qb.push(", department_id = ").push_bind(v.clone());
    }
    if let Some(v) = &patch.status {
        qb.push(", status = ").push_bind(v.clone());
    }
    qb.push(" WHERE id = ").push_bind(existing.id.clone());
    qb.build().execute(&mut *tx).await?;

    tx.commit().await?;

    find_faculty(pool, &existing.id).await
}

/// Soft-delete: apenas o is_active do User ligado muda.
pub async fn deactivate_faculty(pool: &SqlitePool, ident: &str) -> AppResult<()> {
    let existing = find_faculty(pool, ident).await?;
    user_service::set_user_active(pool, &existing.user_id, false).await
}

pub async fn reactivate_faculty(pool: &SqlitePool, ident: &str) -> AppResult<()> {
    let existing = find_faculty(pool, ident).await?;
    user_service::set_user_active(pool, &existing.user_id, true).await
}
