// src/web/envelope.rs
//
// Envelope uniforme de todas as respostas da API:
// { success, data?, message?, error?, pagination? }
// O ramo de erro é construído em error.rs; aqui ficam os ramos de sucesso.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };
        Pagination {
            page,
            limit,
            total,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<Pagination>,
}

fn respond<T: Serialize>(
    status: StatusCode,
    data: Option<T>,
    message: Option<&str>,
    pagination: Option<Pagination>,
) -> Response {
    let body = ApiResponse {
        success: true,
        message: message.map(str::to_string),
        data,
        pagination,
    };
    (status, Json(body)).into_response()
}

/// 200 com dados e mensagem.
pub fn ok<T: Serialize>(data: T, message: &str) -> Response {
    respond(StatusCode::OK, Some(data), Some(message), None)
}

/// 201 para criações.
pub fn created<T: Serialize>(data: T, message: &str) -> Response {
    respond(StatusCode::CREATED, Some(data), Some(message), None)
}

/// 200 só com mensagem (remoções, desativações).
pub fn message_only(message: &str) -> Response {
    respond::<serde_json::Value>(StatusCode::OK, None, Some(message), None)
}

/// 200 com a página de resultados e os metadados de paginação.
pub fn paginated<T: Serialize>(data: Vec<T>, pagination: Pagination) -> Response {
    respond(StatusCode::OK, Some(data), None, Some(pagination))
}
