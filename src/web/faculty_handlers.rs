// src/web/faculty_handlers.rs
use crate::{
    error::AppResult,
    models::faculty::{CreateFacultyPayload, UpdateFacultyPayload},
    models::ListParams,
    services::faculty_service,
    state::AppState,
    web::envelope::{self, Pagination},
    web::extract::{Json, Query},
};
use axum::{
    extract::{Path, State},
    response::Response,
};

// GET /api/v1/faculty
pub async fn list_faculty(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    let (rows, total) = faculty_service::list_faculty(&state.db_pool, &params).await?;
    Ok(envelope::paginated(
        rows,
        Pagination::new(params.page(), params.limit(), total),
    ))
}

// GET /api/v1/faculty/{id} — aceita o ID interno ou o ID de funcionário.
pub async fn get_faculty(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let faculty = faculty_service::find_faculty(&state.db_pool, &id).await?;
    Ok(envelope::ok(faculty, "Docente encontrado."))
}

// POST /api/v1/faculty
pub async fn create_faculty(
    State(state): State<AppState>,
    Json(payload): Json<CreateFacultyPayload>,
) -> AppResult<Response> {
    let new = payload.validate()?;
    let faculty = faculty_service::create_faculty(&state.db_pool, new).await?;
    Ok(envelope::created(faculty, "Docente criado com sucesso."))
}

// PUT /api/v1/faculty/{id}
pub async fn update_faculty(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateFacultyPayload>,
) -> AppResult<Response> {
    let patch = payload.validate()?;
    let faculty = faculty_service::update_faculty(&state.db_pool, &id, patch).await?;
    Ok(envelope::ok(faculty, "Docente atualizado com sucesso."))
}

// DELETE /api/v1/faculty/{id} — soft-delete via is_active do User.
pub async fn delete_faculty(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    faculty_service::deactivate_faculty(&state.db_pool, &id).await?;
    Ok(envelope::message_only("Docente desativado com sucesso."))
}

// POST /api/v1/faculty/{id}/reactivate
pub async fn reactivate_faculty(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    faculty_service::reactivate_faculty(&state.db_pool, &id).await?;
    Ok(envelope::message_only("Docente reativado com sucesso."))
}
