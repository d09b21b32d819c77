// src/web/department_handlers.rs
use crate::{
    error::AppResult,
    models::department::{CreateDepartmentPayload, UpdateDepartmentPayload},
    models::ListParams,
    services::department_service,
    state::AppState,
    web::envelope::{self, Pagination},
    web::extract::{Json, Query},
};
use axum::{
    extract::{Path, State},
    response::Response,
};

// GET /api/v1/departments
pub async fn list_departments(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    let (rows, total) = department_service::list_departments(&state.db_pool, &params).await?;
    Ok(envelope::paginated(
        rows,
        Pagination::new(params.page(), params.limit(), total),
    ))
}

// GET /api/v1/departments/{id} — aceita o ID interno ou o código.
pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let department = department_service::find_department(&state.db_pool, &id).await?;
    Ok(envelope::ok(department, "Departamento encontrado."))
}

// POST /api/v1/departments
pub async fn create_department(
    State(state): State<AppState>,
    Json(payload): Json<CreateDepartmentPayload>,
) -> AppResult<Response> {
    let new = payload.validate()?;
    let department = department_service::create_department(&state.db_pool, new).await?;
    Ok(envelope::created(department, "Departamento criado com sucesso."))
}

// PUT /api/v1/departments/{id}
pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateDepartmentPayload>,
) -> AppResult<Response> {
    let patch = payload.validate()?;
    let department = department_service::update_department(&state.db_pool, &id, patch).await?;
    Ok(envelope::ok(department, "Departamento atualizado com sucesso."))
}

// DELETE /api/v1/departments/{id} — remoção física, recusada com dependentes.
pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    department_service::delete_department(&state.db_pool, &id).await?;
    Ok(envelope::message_only("Departamento removido com sucesso."))
}
