// src/web/subject_handlers.rs
use crate::{
    error::AppResult,
    models::subject::{CreateSubjectPayload, UpdateSubjectPayload},
    models::ListParams,
    services::subject_service,
    state::AppState,
    web::envelope::{self, Pagination},
    web::extract::{Json, Query},
};
use axum::{
    extract::{Path, State},
    response::Response,
};

// GET /api/v1/subjects
pub async fn list_subjects(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    let (rows, total) = subject_service::list_subjects(&state.db_pool, &params).await?;
    Ok(envelope::paginated(
        rows,
        Pagination::new(params.page(), params.limit(), total),
    ))
}

// GET /api/v1/subjects/{id} — aceita o ID interno ou o código.
pub async fn get_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let subject = subject_service::find_subject(&state.db_pool, &id).await?;
    Ok(envelope::ok(subject, "Disciplina encontrada."))
}

// POST /api/v1/subjects
pub async fn create_subject(
    State(state): State<AppState>,
    Json(payload): Json<CreateSubjectPayload>,
) -> AppResult<Response> {
    let new = payload.validate()?;
    let subject = subject_service::create_subject(&state.db_pool, new).await?;
    Ok(envelope::created(subject, "Disciplina criada com sucesso."))
}

// PUT /api/v1/subjects/{id}
pub async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSubjectPayload>,
) -> AppResult<Response> {
    let patch = payload.validate()?;
    let subject = subject_service::update_subject(&state.db_pool, &id, patch).await?;
    Ok(envelope::ok(subject, "Disciplina atualizada com sucesso."))
}

// DELETE /api/v1/subjects/{id}
pub async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    subject_service::delete_subject(&state.db_pool, &id).await?;
    Ok(envelope::message_only("Disciplina removida com sucesso."))
}
