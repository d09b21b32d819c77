// src/services/student_service.rs
use crate::{
    error::{conflict_on_unique, AppError, AppResult, FieldErrors},
    models::student::{NewStudent, StudentDetail, UpdateStudentPayload},
    models::ListParams,
    services::{auth_service, course_service, department_service, user_service},
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

const STUDENT_SELECT: &str = "SELECT s.id, s.user_id, s.admission_number, s.admission_date, \
     s.course_id, s.department_id, s.semester, s.section, s.batch, s.roll_number, s.status, \
     s.created_at, s.updated_at, \
     u.email, u.first_name, u.last_name, u.phone, u.is_active, \
     d.name AS department_name, c.name AS course_name \
     FROM students s \
     JOIN users u ON u.id = s.user_id \
     JOIN departments d ON d.id = s.department_id \
     JOIN courses c ON c.id = s.course_id";

const CONFLICT_MSG: &str = "Já existe um estudante com este número de admissão.";

/// Busca por ID interno ou, em alternativa, pelo número de admissão.
pub async fn find_student(pool: &SqlitePool, ident: &str) -> AppResult<StudentDetail> {
    tracing::debug!("Buscando estudante '{}'", ident);
    sqlx::query_as::<_, StudentDetail>(&format!(
        "{STUDENT_SELECT} WHERE s.id = ? OR s.admission_number = ? LIMIT 1"
    ))
    .bind(ident)
    .bind(ident)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Estudante não encontrado.".to_string()))
}

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Sqlite>, params: &ListParams) {
    if let Some(dep) = &params.department_id {
        qb.push(" AND s.department_id = ").push_bind(dep.clone());
    }
    if let Some(course) = &params.course_id {
        qb.push(" AND s.course_id = ").push_bind(course.clone());
    }
    if let Some(semester) = params.semester {
        qb.push(" AND s.semester = ").push_bind(semester);
    }
    if let Some(status) = &params.status {
        qb.push(" AND s.status = ").push_bind(status.clone());
    }
    if let Some(pattern) = params.search_pattern() {
        qb.push(" AND (LOWER(s.admission_number) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR LOWER(s.roll_number) LIKE ")
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

pub async fn list_students(
    pool: &SqlitePool,
    params: &ListParams,
) -> AppResult<(Vec<StudentDetail>, i64)> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(STUDENT_SELECT);
    qb.push(" WHERE 1=1");
    push_filters(&mut qb, params);
    qb.push(" ORDER BY s.created_at DESC, s.id DESC LIMIT ")
        .push_bind(params.limit())
        .push(" OFFSET ")
        .push_bind(params.offset());
    let rows = qb.build_query_as::<StudentDetail>().fetch_all(pool).await?;

    // A contagem só precisa do JOIN com users (a busca toca campos do perfil).
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT COUNT(*) FROM students s JOIN users u ON u.id = s.user_id WHERE 1=1",
    );
    push_filters(&mut qb, params);
    let total: i64 = qb.build_query_scalar().fetch_one(pool).await?;

    Ok((rows, total))
}

/// Cria o User e o Student numa única transação: ou ficam os dois, ou nenhum.
/// Os IDs são UUIDs gerados aqui, por isso criações concorrentes nunca colidem;
/// email e número de admissão duplicados são travados pelos índices UNIQUE.
pub async fn create_student(pool: &SqlitePool, new: NewStudent) -> AppResult<StudentDetail> {
    tracing::info!("Criando estudante '{}'...", new.admission_number);

    // 1. Valida os campos referenciais antes de tocar em qualquer escrita.
    let mut errors = FieldErrors::new();
    if !department_service::department_exists(pool, &new.department_id).await? {
        errors.insert("departmentId".to_string(), "Departamento não encontrado.".to_string());
    }
    if !course_service::course_exists(pool, &new.course_id).await? {
        errors.insert("courseId".to_string(), "Curso não encontrado.".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    // 2. Hash fora da transação (spawn_blocking pode demorar).
    let password_hash = auth_service::hash_password(&new.password).await?;

    // 3. User + Student na mesma transação.
    let mut tx = pool.begin().await?;

    let user_id = user_service::insert_user(
        &mut *tx,
        &user_service::NewUserRecord {
            email: new.email.clone(),
            password_hash,
            role: "student".to_string(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            phone: new.phone.clone(),
            date_of_birth: new.date_of_birth,
            gender: new.gender.clone(),
            // Criado pelo admin, logo já verificado.
            is_verified: true,
        },
    )
    .await?;

    let student_id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO students (id, user_id, admission_number, admission_date, course_id,
                              department_id, semester, section, batch, roll_number)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&student_id)
    .bind(&user_id)
    .bind(&new.admission_number)
    .bind(new.admission_date)
    .bind(&new.course_id)
    .bind(&new.department_id)
    .bind(new.semester)
    .bind(&new.section)
    .bind(&new.batch)
    .bind(&new.roll_number)
    .execute(&mut *tx)
    .await
    .map_err(|e| conflict_on_unique(e, CONFLICT_MSG))?;

    tx.commit().await?;
    tracing::info!("✅ Estudante '{}' criado.", new.admission_number);

    find_student(pool, &student_id).await
}

/// Update parcial. Os campos do perfil (nome, telefone, data de nascimento)
/// pertencem ao User e são propagados na mesma transação que o update do
/// registo académico.
pub async fn update_student(
    pool: &SqlitePool,
    ident: &str,
    patch: UpdateStudentPayload,
) -> AppResult<StudentDetail> {
    let existing = find_student(pool, ident).await?;

    let mut errors = FieldErrors::new();
    if let Some(dep) = &patch.department_id {
        if !department_service::department_exists(pool, dep).await? {
            errors.insert("departmentId".to_string(), "Departamento não encontrado.".to_string());
        }
    }
    if let Some(course) = &patch.course_id {
        if !course_service::course_exists(pool, course).await? {
            errors.insert("courseId".to_string(), "Curso não encontrado.".to_string());
        }
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    tracing::info!("Atualizando estudante '{}'", existing.id);
    let mut tx = pool.begin().await?;

    user_service::apply_profile_patch(&mut *tx, &existing.user_id, &patch.user_patch()).await?;

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("UPDATE students SET updated_at = datetime('now')");
    if let Some(v) = &patch.course_id {
        qb.push(", course_id = ").push_bind(v.clone());
    }
    if let Some(v) = &patch.department_id {
        qb.push(", department_id = ").push_bind(v.clone());
    }
    if let Some(v) = patch.semester {
        qb.push(", semester = ").push_bind(v);
    }
    if let Some(v) = &patch.section {
        qb.push(", section = ").push_bind(v.clone());
    }
    if let Some(v) = &patch.batch {
        qb.push(", batch = ").push_bind(v.clone());
    }
    if let Some(v) = &patch.roll_number {
        qb.push(", roll_number = ").push_bind(v.clone());
    }
    if let Some(v) = &patch.status {
        qb.push(", status = ").push_bind(v.clone());
    }
    qb.push(" WHERE id = ").push_bind(existing.id.clone());
    qb.build().execute(&mut *tx).await?;

    tx.commit().await?;

    find_student(pool, &existing.id).await
}

/// Soft-delete: desliga o is_active do User ligado. O registo do estudante
/// fica intacto para preservar o histórico académico.
pub async fn deactivate_student(pool: &SqlitePool, ident: &str) -> AppResult<()> {
    let existing = find_student(pool, ident).await?;
    user_service::set_user_active(pool, &existing.user_id, false).await
}

/// Reverte a desativação (operação explícita, exigida pelo soft-delete).
pub async fn reactivate_student(pool: &SqlitePool, ident: &str) -> AppResult<()> {
    let existing = find_student(pool, ident).await?;
    user_service::set_user_active(pool, &existing.user_id, true).await
}
