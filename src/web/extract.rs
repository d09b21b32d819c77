// src/web/extract.rs
//
// Extractors com a rejeição dentro do envelope: um corpo JSON ou uma query
// string que não desserializa vira um erro de validação normal (400 com o
// mapa campo→mensagem), nunca a resposta em texto plano do axum.
use crate::error::AppError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Corpo do pedido rejeitado: {}", rejection.body_text());
        AppError::field("body", &rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("Query string rejeitada: {}", rejection.body_text());
        AppError::field("query", &rejection.body_text())
    }
}
