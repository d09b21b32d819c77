// src/services/department_service.rs
use crate::{
    error::{conflict_on_unique, AppError, AppResult},
    models::department::{DepartmentDetail, NewDepartment, UpdateDepartmentPayload},
    models::ListParams,
    services::faculty_service,
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

// SELECT base com o resumo do chefe de departamento (HOD) anexado.
const DEPARTMENT_SELECT: &str = "SELECT d.id, d.name, d.code, d.description, d.hod_id, \
     d.established_year, d.is_active, d.created_at, d.updated_at, \
     hu.first_name AS hod_first_name, hu.last_name AS hod_last_name \
     FROM departments d \
     LEFT JOIN faculty hf ON hf.id = d.hod_id \
     LEFT JOIN users hu ON hu.id = hf.user_id";

const CONFLICT_MSG: &str = "Já existe um departamento com este nome ou código.";

pub async fn department_exists(pool: &SqlitePool, id: &str) -> AppResult<bool> {
    let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM departments WHERE id = ?)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(found)
}

/// Busca por ID interno ou, em alternativa, pelo código do departamento.
pub async fn find_department(pool: &SqlitePool, ident: &str) -> AppResult<DepartmentDetail> {
    tracing::debug!("Buscando departamento '{}'", ident);
    sqlx::query_as::<_, DepartmentDetail>(&format!(
        "{DEPARTMENT_SELECT} WHERE d.id = ? OR d.code = UPPER(?) LIMIT 1"
    ))
    .bind(ident)
    .bind(ident)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Departamento não encontrado.".to_string()))
}

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Sqlite>, params: &ListParams) {
    if let Some(pattern) = params.search_pattern() {
        qb.push(" AND (LOWER(d.name) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR LOWER(d.code) LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

/// Lista paginada, ordenada por criação descendente.
pub async fn list_departments(
    pool: &SqlitePool,
    params: &ListParams,
) -> AppResult<(Vec<DepartmentDetail>, i64)> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(DEPARTMENT_SELECT);
    qb.push(" WHERE 1=1");
    push_filters(&mut qb, params);
    qb.push(" ORDER BY d.created_at DESC, d.id DESC LIMIT ")
        .push_bind(params.limit())
        .push(" OFFSET ")
        .push_bind(params.offset());
    let rows = qb
        .build_query_as::<DepartmentDetail>()
        .fetch_all(pool)
        .await?;

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM departments d WHERE 1=1");
    push_filters(&mut qb, params);
    let total: i64 = qb.build_query_scalar().fetch_one(pool).await?;

    Ok((rows, total))
}

pub async fn create_department(
    pool: &SqlitePool,
    new: NewDepartment,
) -> AppResult<DepartmentDetail> {
    tracing::info!("Criando departamento '{}'...", new.code);

    if let Some(hod_id) = &new.hod_id {
        if !faculty_service::faculty_exists(pool, hod_id).await? {
            return Err(AppError::field("hodId", "Docente não encontrado."));
        }
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO departments (id, name, code, description, hod_id, established_year)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new.name)
    .bind(&new.code)
    .bind(&new.description)
    .bind(&new.hod_id)
    .bind(new.established_year)
    .execute(pool)
    .await
    .map_err(|e| conflict_on_unique(e, CONFLICT_MSG))?;

    tracing::info!("✅ Departamento '{}' criado.", new.code);
    find_department(pool, &id).await
}

pub async fn update_department(
    pool: &SqlitePool,
    ident: &str,
    patch: UpdateDepartmentPayload,
) -> AppResult<DepartmentDetail> {
    let existing = find_department(pool, ident).await?;
    if patch.is_empty() {
        return Ok(existing);
    }

    if let Some(hod_id) = &patch.hod_id {
        if !faculty_service::faculty_exists(pool, hod_id).await? {
            return Err(AppError::field("hodId", "Docente não encontrado."));
        }
    }

    tracing::info!("Atualizando departamento '{}'", existing.id);
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("UPDATE departments SET updated_at = datetime('now')");
    if let Some(v) = &patch.name {
        qb.push(", name = ").push_bind(v.clone());
    }
    if let Some(v) = &patch.code {
        qb.push(", code = ").push_bind(v.clone());
    }
    if let Some(v) = &patch.description {
        qb.push(", description = ").push_bind(v.clone());
    }
    if let Some(v) = &patch.hod_id {
        qb.push(", hod_id = ").push_bind(v.clone());
    }
    if let Some(v) = patch.established_year {
        qb.push(", established_year = ").push_bind(v);
    }
    if let Some(v) = patch.is_active {
        qb.push(", is_active = ").push_bind(v);
    }
    qb.push(" WHERE id = ").push_bind(existing.id.clone());
    qb.build()
        .execute(pool)
        .await
        .map_err(|e| conflict_on_unique(e, CONFLICT_MSG))?;

    find_department(pool, &existing.id).await
}

/// Remoção física, recusada enquanto houver cursos, docentes ou estudantes
/// a referenciar o departamento (as FKs do esquema garantem o mesmo no limite).
pub async fn delete_department(pool: &SqlitePool, ident: &str) -> AppResult<()> {
    let existing = find_department(pool, ident).await?;

    let dependents: i64 = sqlx::query_scalar(
        r#"
        SELECT (SELECT COUNT(*) FROM courses WHERE department_id = ?1)
             + (SELECT COUNT(*) FROM faculty WHERE department_id = ?1)
             + (SELECT COUNT(*) FROM students WHERE department_id = ?1)
        "#,
    )
    .bind(&existing.id)
    .fetch_one(pool)
    .await?;
    if dependents > 0 {
        return Err(AppError::Conflict(
            "O departamento tem registos dependentes e não pode ser removido.".to_string(),
        ));
    }

    sqlx::query("DELETE FROM departments WHERE id = ?")
        .bind(&existing.id)
        .execute(pool)
        .await?;
    tracing::info!("🗑️ Departamento '{}' removido.", existing.code);
    Ok(())
}
