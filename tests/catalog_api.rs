// tests/catalog_api.rs
//
// Departamentos, cursos e disciplinas: unicidade, busca, paginação e as
// regras de remoção com dependentes.
mod common;

use axum::http::{Method, StatusCode};
use axum::Router;
use common::*;
use serde_json::json;

async fn post_json(
    app: &Router,
    session: &str,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = send(app, with_session(json_request(Method::POST, uri, body), session)).await;
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn codigo_de_departamento_duplicado_e_conflito() {
    let (app, _pool) = test_app().await;
    let session = login_admin(&app).await;

    let (status, created) = post_json(
        &app,
        &session,
        "/api/v1/departments",
        json!({ "name": "Computer Science", "code": "cs101" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    // Código normalizado para maiúsculas na entrada.
    assert_eq!(created["data"]["code"], "CS101");

    let (status, body) = post_json(
        &app,
        &session,
        "/api/v1/departments",
        json!({ "name": "Ciência de Computadores", "code": "CS101" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    // O registo original continua intacto e acessível pelo código.
    let response = send(
        &app,
        with_session(request(Method::GET, "/api/v1/departments/CS101"), &session),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "Computer Science");
}

#[tokio::test]
async fn busca_e_case_insensitive_e_parcial() {
    let (app, _pool) = test_app().await;
    let session = login_admin(&app).await;

    for (name, code) in [("Computer Science", "CS101"), ("Matemática", "MAT"), ("Física", "FIS")] {
        let (status, _) = post_json(
            &app,
            &session,
            "/api/v1/departments",
            json!({ "name": name, "code": code }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let response = send(
        &app,
        with_session(
            request(Method::GET, "/api/v1/departments?search=cs1"),
            &session,
        ),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["code"], "CS101");
}

#[tokio::test]
async fn busca_trata_curingas_do_like_como_literais() {
    let (app, _pool) = test_app().await;
    let session = login_admin(&app).await;

    let (status, _) = post_json(
        &app,
        &session,
        "/api/v1/departments",
        json!({ "name": "Design", "code": "D10" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // '_' é curinga do LIKE; escapado, "1_" deixa de casar com "D10".
    let response = send(
        &app,
        with_session(
            request(Method::GET, "/api/v1/departments?search=1_"),
            &session,
        ),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["pagination"]["total"], 0);

    // O mesmo para '%': sozinho não vira um "match tudo".
    let response = send(
        &app,
        with_session(
            request(Method::GET, "/api/v1/departments?search=%25"),
            &session,
        ),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["pagination"]["total"], 0);

    // A busca literal continua a funcionar.
    let response = send(
        &app,
        with_session(
            request(Method::GET, "/api/v1/departments?search=d1"),
            &session,
        ),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["code"], "D10");
}

#[tokio::test]
async fn paginacao_de_departamentos() {
    let (app, _pool) = test_app().await;
    let session = login_admin(&app).await;

    for i in 0..5 {
        let (status, _) = post_json(
            &app,
            &session,
            "/api/v1/departments",
            json!({ "name": format!("Departamento {}", i), "code": format!("D{}", i) }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let response = send(
        &app,
        with_session(
            request(Method::GET, "/api/v1/departments?page=2&limit=2"),
            &session,
        ),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["pagination"]["limit"], 2);
    assert_eq!(body["pagination"]["total"], 5);
    assert_eq!(body["pagination"]["totalPages"], 3);
    assert_eq!(body["pagination"]["hasNextPage"], true);
    assert_eq!(body["pagination"]["hasPrevPage"], true);
}

#[tokio::test]
async fn remocao_com_dependentes_e_recusada() {
    let (app, _pool) = test_app().await;
    let session = login_admin(&app).await;

    let (_, dept) = post_json(
        &app,
        &session,
        "/api/v1/departments",
        json!({ "name": "Química", "code": "QUI" }),
    )
    .await;
    let dept_id = dept["data"]["id"].as_str().unwrap().to_string();

    let (status, course) = post_json(
        &app,
        &session,
        "/api/v1/courses",
        json!({
            "name": "Licenciatura em Química",
            "code": "LQUI",
            "departmentId": dept_id,
            "degree": "UG",
            "duration": 3,
            "totalSemesters": 6
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let course_id = course["data"]["id"].as_str().unwrap().to_string();

    // Departamento com curso dependente: 409.
    let response = send(
        &app,
        with_session(
            request(Method::DELETE, &format!("/api/v1/departments/{}", dept_id)),
            &session,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Removido o curso, a remoção do departamento passa a ser possível.
    let response = send(
        &app,
        with_session(
            request(Method::DELETE, &format!("/api/v1/courses/{}", course_id)),
            &session,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        with_session(
            request(Method::DELETE, &format!("/api/v1/departments/{}", dept_id)),
            &session,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        with_session(
            request(Method::GET, &format!("/api/v1/departments/{}", dept_id)),
            &session,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn disciplinas_filtram_por_curso_e_semestre() {
    let (app, _pool) = test_app().await;
    let session = login_admin(&app).await;

    let (_, dept) = post_json(
        &app,
        &session,
        "/api/v1/departments",
        json!({ "name": "Informática", "code": "INF" }),
    )
    .await;
    let dept_id = dept["data"]["id"].as_str().unwrap().to_string();

    let (_, course) = post_json(
        &app,
        &session,
        "/api/v1/courses",
        json!({
            "name": "Engenharia Informática",
            "code": "EI",
            "departmentId": dept_id,
            "degree": "UG",
            "duration": 4,
            "totalSemesters": 8
        }),
    )
    .await;
    let course_id = course["data"]["id"].as_str().unwrap().to_string();

    let (status, created) = post_json(
        &app,
        &session,
        "/api/v1/subjects",
        json!({
            "name": "Estruturas de Dados",
            "code": "ED101",
            "courseId": course_id,
            "semester": 2,
            "credits": 6,
            "type": "practical"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    // O campo chega e sai como 'type' no JSON.
    assert_eq!(created["data"]["type"], "practical");
    assert_eq!(created["data"]["courseName"], "Engenharia Informática");

    let (status, _) = post_json(
        &app,
        &session,
        "/api/v1/subjects",
        json!({
            "name": "Programação I",
            "code": "P101",
            "courseId": course_id,
            "semester": 1,
            "credits": 6
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let response = send(
        &app,
        with_session(
            request(
                Method::GET,
                &format!("/api/v1/subjects?courseId={}&semester=2", course_id),
            ),
            &session,
        ),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["code"], "ED101");
}

#[tokio::test]
async fn curso_exige_departamento_existente() {
    let (app, _pool) = test_app().await;
    let session = login_admin(&app).await;

    let (status, body) = post_json(
        &app,
        &session,
        "/api/v1/courses",
        json!({
            "name": "Curso Fantasma",
            "code": "CF",
            "departmentId": "nao-existe",
            "degree": "UG",
            "duration": 3,
            "totalSemesters": 6
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["details"].get("departmentId").is_some());
}

#[tokio::test]
async fn grau_invalido_e_rejeitado() {
    let (app, _pool) = test_app().await;
    let session = login_admin(&app).await;

    let (_, dept) = post_json(
        &app,
        &session,
        "/api/v1/departments",
        json!({ "name": "Letras", "code": "LET" }),
    )
    .await;
    let dept_id = dept["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        &app,
        &session,
        "/api/v1/courses",
        json!({
            "name": "Curso X",
            "code": "CX",
            "departmentId": dept_id,
            "degree": "Bootcamp",
            "duration": 1,
            "totalSemesters": 2
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["details"].get("degree").is_some());
}
