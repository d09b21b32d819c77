// src/web/student_handlers.rs
use crate::{
    error::AppResult,
    models::student::{CreateStudentPayload, UpdateStudentPayload},
    models::ListParams,
    services::student_service,
    state::AppState,
    web::envelope::{self, Pagination},
    web::extract::{Json, Query},
};
use axum::{
    extract::{Path, State},
    response::Response,
};

// GET /api/v1/students
pub async fn list_students(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    let (rows, total) = student_service::list_students(&state.db_pool, &params).await?;
    Ok(envelope::paginated(
        rows,
        Pagination::new(params.page(), params.limit(), total),
    ))
}

// GET /api/v1/students/{id} — aceita o ID interno ou o número de admissão.
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let student = student_service::find_student(&state.db_pool, &id).await?;
    Ok(envelope::ok(student, "Estudante encontrado."))
}

// POST /api/v1/students
pub async fn create_student(
    State(state): State<AppState>,
    Json(payload): Json<CreateStudentPayload>,
) -> AppResult<Response> {
    let new = payload.validate()?;
    let student = student_service::create_student(&state.db_pool, new).await?;
    Ok(envelope::created(student, "Estudante criado com sucesso."))
}

// PUT /api/v1/students/{id}
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStudentPayload>,
) -> AppResult<Response> {
    let patch = payload.validate()?;
    let student = student_service::update_student(&state.db_pool, &id, patch).await?;
    Ok(envelope::ok(student, "Estudante atualizado com sucesso."))
}

// DELETE /api/v1/students/{id} — soft-delete via is_active do User.
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    student_service::deactivate_student(&state.db_pool, &id).await?;
    Ok(envelope::message_only("Estudante desativado com sucesso."))
}

// POST /api/v1/students/{id}/reactivate
pub async fn reactivate_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    student_service::reactivate_student(&state.db_pool, &id).await?;
    Ok(envelope::message_only("Estudante reativado com sucesso."))
}
