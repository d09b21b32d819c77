// src/services/course_service.rs
use crate::{
    error::{conflict_on_unique, AppError, AppResult},
    models::course::{CourseDetail, NewCourse, UpdateCoursePayload},
    models::ListParams,
    services::department_service,
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

const COURSE_SELECT: &str = "SELECT c.id, c.name, c.code, c.department_id, c.degree, \
     c.duration, c.total_semesters, c.description, c.is_active, c.created_at, c.updated_at, \
     d.name AS department_name \
     FROM courses c \
     JOIN departments d ON d.id = c.department_id";

const CONFLICT_MSG: &str = "Já existe um curso com este código.";

pub async fn course_exists(pool: &SqlitePool, id: &str) -> AppResult<bool> {
    let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM courses WHERE id = ?)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(found)
}

/// Busca por ID interno ou pelo código do curso.
pub async fn find_course(pool: &SqlitePool, ident: &str) -> AppResult<CourseDetail> {
    tracing::debug!("Buscando curso '{}'", ident);
    sqlx::query_as::<_, CourseDetail>(&format!(
        "{COURSE_SELECT} WHERE c.id = ? OR c.code = UPPER(?) LIMIT 1"
    ))
    .bind(ident)
    .bind(ident)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Curso não encontrado.".to_string()))
}

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Sqlite>, params: &ListParams) {
    if let Some(dep) = &params.department_id {
        qb.push(" AND c.department_id = ").push_bind(dep.clone());
    }
    if let Some(pattern) = params.search_pattern() {
        qb.push(" AND (LOWER(c.name) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR LOWER(c.code) LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

pub async fn list_courses(
    pool: &SqlitePool,
    params: &ListParams,
) -> AppResult<(Vec<CourseDetail>, i64)> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(COURSE_SELECT);
    qb.push(" WHERE 1=1");
    push_filters(&mut qb, params);
    qb.push(" ORDER BY c.created_at DESC, c.id DESC LIMIT ")
        .push_bind(params.limit())
        .push(" OFFSET ")
        .push_bind(params.offset());
    let rows = qb.build_query_as::<CourseDetail>().fetch_all(pool).await?;

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM courses c WHERE 1=1");
    push_filters(&mut qb, params);
    let total: i64 = qb.build_query_scalar().fetch_one(pool).await?;

    Ok((rows, total))
}

pub async fn create_course(pool: &SqlitePool, new: NewCourse) -> AppResult<CourseDetail> {
    tracing::info!("Criando curso '{}'...", new.code);

    if !department_service::department_exists(pool, &new.department_id).await? {
        return Err(AppError::field("departmentId", "Departamento não encontrado."));
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO courses (id, name, code, department_id, degree, duration,
                             total_semesters, description)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new.name)
    .bind(&new.code)
    .bind(&new.department_id)
    .bind(&new.degree)
    .bind(new.duration)
    .bind(new.total_semesters)
    .bind(&new.description)
    .execute(pool)
    .await
    .map_err(|e| conflict_on_unique(e, CONFLICT_MSG))?;

    tracing::info!("✅ Curso '{}' criado.", new.code);
    find_course(pool, &id).await
}

pub async fn update_course(
    pool: &SqlitePool,
    ident: &str,
    patch: UpdateCoursePayload,
) -> AppResult<CourseDetail> {
    let existing = find_course(pool, ident).await?;

    if let Some(dep) = &patch.department_id {
        if !department_service::department_exists(pool, dep).await? {
            return Err(AppError::field("departmentId", "Departamento não encontrado."));
        }
    }

    tracing::info!("Atualizando curso '{}'", existing.id);
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("UPDATE courses SET updated_at = datetime('now')");
    if let Some(v) = &patch.name {
        qb.push(", name = ").push_bind(v.clone());
    }
    if let Some(v) = &patch.code {
        qb.push(", code = ").push_bind(v.clone());
    }
    if let Some(v) = &patch.department_id {
        qb.push(", department_id = ").push_bind(v.clone());
    }
    if let Some(v) = &patch.degree {
        qb.push(", degree = ").push_bind(v.clone());
    }
    if let Some(v) = patch.duration {
        qb.push(", duration = ").push_bind(v);
    }
    if let Some(v) = patch.total_semesters {
        qb.push(", total_semesters = ").push_bind(v);
    }
    if let Some(v) = &patch.description {
        qb.push(", description = ").push_bind(v.clone());
    }
    if let Some(v) = patch.is_active {
        qb.push(", is_active = ").push_bind(v);
    }
    qb.push(" WHERE id = ").push_bind(existing.id.clone());
    qb.build()
        .execute(pool)
        .await
        .map_err(|e| conflict_on_unique(e, CONFLICT_MSG))?;

    find_course(pool, &existing.id).await
}

/// Remoção física, recusada enquanto houver disciplinas ou estudantes ligados.
pub async fn delete_course(pool: &SqlitePool, ident: &str) -> AppResult<()> {
    let existing = find_course(pool, ident).await?;

    let dependents: i64 = sqlx::query_scalar(
        r#"
        SELECT (SELECT COUNT(*) FROM subjects WHERE course_id = ?1)
             + (SELECT COUNT(*) FROM students WHERE course_id = ?1)
        "#,
    )
    .bind(&existing.id)
    .fetch_one(pool)
    .await?;
    if dependents > 0 {
        return Err(AppError::Conflict(
            "O curso tem registos dependentes e não pode ser removido.".to_string(),
        ));
    }

    sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(&existing.id)
        .execute(pool)
        .await?;
    tracing::info!("🗑️ Curso '{}' removido.", existing.code);
    Ok(())
}
