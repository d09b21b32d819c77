// tests/students_api.rs
mod common;

use axum::http::{Method, StatusCode};
use axum::Router;
use common::*;
use serde_json::json;

async fn create_department(app: &Router, session: &str, name: &str, code: &str) -> String {
    let response = send(
        app,
        with_session(
            json_request(
                Method::POST,
                "/api/v1/departments",
                json!({ "name": name, "code": code }),
            ),
            session,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["data"]["id"].as_str().expect("id do departamento").to_string()
}

async fn create_course(app: &Router, session: &str, department_id: &str, code: &str) -> String {
    let response = send(
        app,
        with_session(
            json_request(
                Method::POST,
                "/api/v1/courses",
                json!({
                    "name": "BTech Computer Science",
                    "code": code,
                    "departmentId": department_id,
                    "degree": "UG",
                    "duration": 4,
                    "totalSemesters": 8
                }),
            ),
            session,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["data"]["id"].as_str().expect("id do curso").to_string()
}

fn student_payload(dept: &str, course: &str, admission: &str, email: &str) -> serde_json::Value {
    json!({
        "email": email,
        "firstName": "Joana",
        "lastName": "Almeida",
        "admissionNumber": admission,
        "departmentId": dept,
        "courseId": course,
        "semester": 1
    })
}

#[tokio::test]
async fn ciclo_completo_do_estudante() {
    let (app, pool) = test_app().await;
    let session = login_admin(&app).await;

    let dept = create_department(&app, &session, "Computer Science", "CS").await;
    let course = create_course(&app, &session, &dept, "BTCS").await;

    // Criação: User + Student de uma vez, com defaults aplicados.
    let response = send(
        &app,
        with_session(
            json_request(
                Method::POST,
                "/api/v1/students",
                student_payload(&dept, &course, "ADM-2026-001", "joana@campus.edu"),
            ),
            &session,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let student_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["email"], "joana@campus.edu");
    assert_eq!(body["data"]["section"], "A");
    assert_eq!(body["data"]["rollNumber"], "ADM-2026-001");
    assert_eq!(body["data"]["departmentName"], "Computer Science");
    assert_eq!(body["data"]["status"], "active");

    // Listagem filtrada por curso.
    let response = send(
        &app,
        with_session(
            request(Method::GET, &format!("/api/v1/students?courseId={}", course)),
            &session,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["id"], student_id.as_str());

    // Lookup alternativo pelo número de admissão.
    let response = send(
        &app,
        with_session(
            request(Method::GET, "/api/v1/students/ADM-2026-001"),
            &session,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["id"], student_id.as_str());

    // Update parcial: firstName e phone vivem no User e têm de propagar.
    let response = send(
        &app,
        with_session(
            json_request(
                Method::PUT,
                &format!("/api/v1/students/{}", student_id),
                json!({ "firstName": "Mariana", "phone": "912345678", "semester": 2 }),
            ),
            &session,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["firstName"], "Mariana");
    assert_eq!(body["data"]["phone"], "912345678");
    assert_eq!(body["data"]["semester"], 2);

    let (first_name, phone): (String, Option<String>) = sqlx::query_as(
        "SELECT u.first_name, u.phone FROM users u JOIN students s ON s.user_id = u.id WHERE s.id = ?",
    )
    .bind(&student_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(first_name, "Mariana");
    assert_eq!(phone.as_deref(), Some("912345678"));

    // DELETE é soft: desliga o User, mantém o registo académico intacto.
    let response = send(
        &app,
        with_session(
            request(Method::DELETE, &format!("/api/v1/students/{}", student_id)),
            &session,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        with_session(
            request(Method::GET, &format!("/api/v1/students/{}", student_id)),
            &session,
        ),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["isActive"], false);
    assert_eq!(body["data"]["admissionNumber"], "ADM-2026-001");
    assert_eq!(body["data"]["semester"], 2);

    // Conta desativada deixa de autenticar...
    let login_attempt = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/auth/login",
            json!({ "email": "joana@campus.edu", "password": "student123" }),
        ),
    )
    .await;
    assert_eq!(login_attempt.status(), StatusCode::UNAUTHORIZED);

    // ...até ser reativada.
    let response = send(
        &app,
        with_session(
            request(
                Method::POST,
                &format!("/api/v1/students/{}/reactivate", student_id),
            ),
            &session,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let login_attempt = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/auth/login",
            json!({ "email": "joana@campus.edu", "password": "student123" }),
        ),
    )
    .await;
    assert_eq!(login_attempt.status(), StatusCode::OK);
}

#[tokio::test]
async fn duplicados_viram_conflito_sem_registos_orfaos() {
    let (app, pool) = test_app().await;
    let session = login_admin(&app).await;

    let dept = create_department(&app, &session, "Matemática", "MAT").await;
    let course = create_course(&app, &session, &dept, "BMAT").await;

    let first = send(
        &app,
        with_session(
            json_request(
                Method::POST,
                "/api/v1/students",
                student_payload(&dept, &course, "ADM-1", "a@campus.edu"),
            ),
            &session,
        ),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    // Mesmo número de admissão, email novo: Conflict, e o User criado na
    // mesma transação tem de desaparecer com o rollback.
    let response = send(
        &app,
        with_session(
            json_request(
                Method::POST,
                "/api/v1/students",
                student_payload(&dept, &course, "ADM-1", "b@campus.edu"),
            ),
            &session,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let orphan: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
        .bind("b@campus.edu")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(!orphan, "rollback deixou um User órfão");

    // Email duplicado também é Conflict.
    let response = send(
        &app,
        with_session(
            json_request(
                Method::POST,
                "/api/v1/students",
                student_payload(&dept, &course, "ADM-2", "a@campus.edu"),
            ),
            &session,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn referencias_invalidas_sao_erros_de_validacao() {
    let (app, _pool) = test_app().await;
    let session = login_admin(&app).await;

    let response = send(
        &app,
        with_session(
            json_request(
                Method::POST,
                "/api/v1/students",
                student_payload("dep-inexistente", "curso-inexistente", "ADM-9", "x@campus.edu"),
            ),
            &session,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]["details"].get("departmentId").is_some());
    assert!(body["error"]["details"].get("courseId").is_some());
}

#[tokio::test]
async fn corpo_mal_tipado_devolve_envelope_de_validacao() {
    let (app, _pool) = test_app().await;
    let session = login_admin(&app).await;

    let dept = create_department(&app, &session, "Biologia", "BIO").await;
    let course = create_course(&app, &session, &dept, "BBIO").await;

    // JSON válido mas com o tipo errado num campo: tem de sair como 400
    // no envelope, nunca como o 422 em texto plano do extractor.
    let mut payload = student_payload(&dept, &course, "ADM-T-1", "t@campus.edu");
    payload["semester"] = serde_json::Value::String("two".to_string());

    let response = send(
        &app,
        with_session(
            json_request(Method::POST, "/api/v1/students", payload),
            &session,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"].get("body").is_some());
}

#[tokio::test]
async fn query_mal_tipada_devolve_envelope_de_validacao() {
    let (app, _pool) = test_app().await;
    let session = login_admin(&app).await;

    let response = send(
        &app,
        with_session(
            request(Method::GET, "/api/v1/students?semester=abc"),
            &session,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"].get("query").is_some());
}

#[tokio::test]
async fn estudante_inexistente_e_404() {
    let (app, _pool) = test_app().await;
    let session = login_admin(&app).await;

    let response = send(
        &app,
        with_session(request(Method::GET, "/api/v1/students/nao-existe"), &session),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn criacoes_concorrentes_geram_ids_distintos() {
    let (app, pool) = test_app().await;
    let session = login_admin(&app).await;

    let dept = create_department(&app, &session, "Engenharia", "ENG").await;
    let course = create_course(&app, &session, &dept, "BENG").await;

    // Várias criações em paralelo ao nível do serviço: os IDs são UUIDs
    // gerados localmente, nunca derivados de uma contagem.
    let mut handles = Vec::new();
    for i in 0..4 {
        let pool = pool.clone();
        let dept = dept.clone();
        let course = course.clone();
        handles.push(tokio::spawn(async move {
            let payload: academico::models::student::CreateStudentPayload =
                serde_json::from_value(student_payload(
                    &dept,
                    &course,
                    &format!("ADM-C-{}", i),
                    &format!("c{}@campus.edu", i),
                ))
                .unwrap();
            let new = payload.validate().unwrap();
            academico::services::student_service::create_student(&pool, new)
                .await
                .unwrap()
        }));
    }

    let mut ids = std::collections::HashSet::new();
    for handle in handles {
        let student = handle.await.unwrap();
        assert!(ids.insert(student.id), "ID repetido entre criações concorrentes");
    }
    assert_eq!(ids.len(), 4);
}
