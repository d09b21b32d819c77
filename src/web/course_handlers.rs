// src/web/course_handlers.rs
use crate::{
    error::AppResult,
    models::course::{CreateCoursePayload, UpdateCoursePayload},
    models::ListParams,
    services::course_service,
    state::AppState,
    web::envelope::{self, Pagination},
    web::extract::{Json, Query},
};
use axum::{
    extract::{Path, State},
    response::Response,
};

// GET /api/v1/courses
pub async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    let (rows, total) = course_service::list_courses(&state.db_pool, &params).await?;
    Ok(envelope::paginated(
        rows,
        Pagination::new(params.page(), params.limit(), total),
    ))
}

// GET /api/v1/courses/{id} — aceita o ID interno ou o código.
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let course = course_service::find_course(&state.db_pool, &id).await?;
    Ok(envelope::ok(course, "Curso encontrado."))
}

// POST /api/v1/courses
pub async fn create_course(
    State(state): State<AppState>,
    Json(payload): Json<CreateCoursePayload>,
) -> AppResult<Response> {
    let new = payload.validate()?;
    let course = course_service::create_course(&state.db_pool, new).await?;
    Ok(envelope::created(course, "Curso criado com sucesso."))
}

// PUT /api/v1/courses/{id}
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCoursePayload>,
) -> AppResult<Response> {
    let patch = payload.validate()?;
    let course = course_service::update_course(&state.db_pool, &id, patch).await?;
    Ok(envelope::ok(course, "Curso atualizado com sucesso."))
}

// DELETE /api/v1/courses/{id} — remoção física, recusada com dependentes.
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    course_service::delete_course(&state.db_pool, &id).await?;
    Ok(envelope::message_only("Curso removido com sucesso."))
}
