// src/services/subject_service.rs
use crate::{
    error::{conflict_on_unique, AppError, AppResult},
    models::subject::{NewSubject, SubjectDetail, UpdateSubjectPayload},
    models::ListParams,
    services::course_service,
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

const SUBJECT_SELECT: &str = "SELECT s.id, s.name, s.code, s.course_id, s.semester, s.credits, \
     s.subject_type, s.description, s.is_active, s.created_at, s.updated_at, \
     c.name AS course_name, c.code AS course_code \
     FROM subjects s \
     JOIN courses c ON c.id = s.course_id";

const CONFLICT_MSG: &str = "Já existe uma disciplina com este código.";

/// Busca por ID interno ou pelo código da disciplina.
pub async fn find_subject(pool: &SqlitePool, ident: &str) -> AppResult<SubjectDetail> {
    tracing::debug!("Buscando disciplina '{}'", ident);
    sqlx::query_as::<_, SubjectDetail>(&format!(
        "{SUBJECT_SELECT} WHERE s.id = ? OR s.code = UPPER(?) LIMIT 1"
    ))
    .bind(ident)
    .bind(ident)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Disciplina não encontrada.".to_string()))
}

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Sqlite>, params: &ListParams) {
    if let Some(course) = &params.course_id {
        qb.push(" AND s.course_id = ").push_bind(course.clone());
    }
    if let Some(semester) = params.semester {
        qb.push(" AND s.semester = ").push_bind(semester);
    }
    if let Some(pattern) = params.search_pattern() {
        qb.push(" AND (LOWER(s.name) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR LOWER(s.code) LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

pub async fn list_subjects(
    pool: &SqlitePool,
    params: &ListParams,
) -> AppResult<(Vec<SubjectDetail>, i64)> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(SUBJECT_SELECT);
    qb.push(" WHERE 1=1");
    push_filters(&mut qb, params);
    qb.push(" ORDER BY s.created_at DESC, s.id DESC LIMIT ")
        .push_bind(params.limit())
        .push(" OFFSET ")
        .push_bind(params.offset());
    let rows = qb.build_query_as::<SubjectDetail>().fetch_all(pool).await?;

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM subjects s WHERE 1=1");
    push_filters(&mut qb, params);
    let total: i64 = qb.build_query_scalar().fetch_one(pool).await?;

    Ok((rows, total))
}

pub async fn create_subject(pool: &SqlitePool, new: NewSubject) -> AppResult<SubjectDetail> {
    tracing::info!("Criando disciplina '{}'...", new.code);

    if !course_service::course_exists(pool, &new.course_id).await? {
        return Err(AppError::field("courseId", "Curso não encontrado."));
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO subjects (id, name, code, course_id, semester, credits,
                              subject_type, description)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new.name)
    .bind(&new.code)
    .bind(&new.course_id)
    .bind(new.semester)
    .bind(new.credits)
    .bind(&new.subject_type)
    .bind(&new.description)
    .execute(pool)
    .await
    .map_err(|e| conflict_on_unique(e, CONFLICT_MSG))?;

    tracing::info!("✅ Disciplina '{}' criada.", new.code);
    find_subject(pool, &id).await
}

pub async fn update_subject(
    pool: &SqlitePool,
    ident: &str,
    patch: UpdateSubjectPayload,
) -> AppResult<SubjectDetail> {
    let existing = find_subject(pool, ident).await?;

    if let Some(course) = &patch.course_id {
        if !course_service::course_exists(pool, course).await? {
            return Err(AppError::field("courseId", "Curso não encontrado."));
        }
    }

    tracing::info!("Atualizando disciplina '{}'", existing.id);
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("UPDATE subjects SET updated_at = datetime('now')");
    if let Some(v) = &patch.name {
        qb.push(", name = ").push_bind(v.clone());
    }
    if let Some(v) = &patch.code {
        qb.push(", code = ").push_bind(v.clone());
    }
    if let Some(v) = &patch.course_id {
        qb.push(", course_id = ").push_bind(v.clone());
    }
    if let Some(v) = patch.semester {
        qb.push(", semester = ").push_bind(v);
    }
    if let Some(v) = patch.credits {
        qb.push(", credits = ").push_bind(v);
    }
    if let Some(v) = &patch.subject_type {
        qb.push(", subject_type = ").push_bind(v.clone());
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

    find_subject(pool, &existing.id).await
}

pub async fn delete_subject(pool: &SqlitePool, ident: &str) -> AppResult<()> {
    let existing = find_subject(pool, ident).await?;

    sqlx::query("DELETE FROM subjects WHERE id = ?")
        .bind(&existing.id)
        .execute(pool)
        .await?;
    tracing::info!("🗑️ Disciplina '{}' removida.", existing.code);
    Ok(())
}
