// src/web/routes.rs
use crate::{
    state::AppState,
    web::{
        auth_handlers, course_handlers, department_handlers, envelope, faculty_handlers, mw_admin,
        mw_auth, student_handlers, subject_handlers,
    },
};
use axum::{
    middleware,
    response::Response,
    routing::{get, post},
    Router,
};
use serde_json::json;

// GET /api/v1/health — sem autenticação, para probes.
async fn health() -> Response {
    envelope::ok(json!({ "status": "ok" }), "Serviço operacional.")
}

pub fn create_router(app_state: AppState) -> Router {
    // --- Rotas Públicas ---
    let public_routes = Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/auth/login", post(auth_handlers::handle_login))
        .route("/api/v1/auth/register", post(auth_handlers::handle_register));

    // --- Routers por entidade ---
    // Cada um leva o mw_admin, que deixa passar leituras e exige 'admin'
    // nas escritas. O require_auth é aplicado no router pai.
    let student_routes = Router::new()
        .route(
            "/",
            get(student_handlers::list_students).post(student_handlers::create_student),
        )
        .route(
            "/{id}",
            get(student_handlers::get_student)
                .put(student_handlers::update_student)
                .delete(student_handlers::delete_student),
        )
        .route(
            "/{id}/reactivate",
            post(student_handlers::reactivate_student),
        )
        .route_layer(middleware::from_fn(mw_admin::require_admin_mutation));

    let faculty_routes = Router::new()
        .route(
            "/",
            get(faculty_handlers::list_faculty).post(faculty_handlers::create_faculty),
        )
        .route(
            "/{id}",
            get(faculty_handlers::get_faculty)
                .put(faculty_handlers::update_faculty)
                .delete(faculty_handlers::delete_faculty),
        )
        .route(
            "/{id}/reactivate",
            post(faculty_handlers::reactivate_faculty),
        )
        .route_layer(middleware::from_fn(mw_admin::require_admin_mutation));

    let department_routes = Router::new()
        .route(
            "/",
            get(department_handlers::list_departments).post(department_handlers::create_department),
        )
        .route(
            "/{id}",
            get(department_handlers::get_department)
                .put(department_handlers::update_department)
                .delete(department_handlers::delete_department),
        )
        .route_layer(middleware::from_fn(mw_admin::require_admin_mutation));

    let course_routes = Router::new()
        .route(
            "/",
            get(course_handlers::list_courses).post(course_handlers::create_course),
        )
        .route(
            "/{id}",
            get(course_handlers::get_course)
                .put(course_handlers::update_course)
                .delete(course_handlers::delete_course),
        )
        .route_layer(middleware::from_fn(mw_admin::require_admin_mutation));

    let subject_routes = Router::new()
        .route(
            "/",
            get(subject_handlers::list_subjects).post(subject_handlers::create_subject),
        )
        .route(
            "/{id}",
            get(subject_handlers::get_subject)
                .put(subject_handlers::update_subject)
                .delete(subject_handlers::delete_subject),
        )
        .route_layer(middleware::from_fn(mw_admin::require_admin_mutation));

    // --- Rotas Autenticadas ---
    // Exigem sessão válida; o require_auth coloca o CurrentUser nas extensões.
    let authenticated_routes = Router::new()
        .route("/api/v1/auth/logout", post(auth_handlers::handle_logout))
        .route("/api/v1/auth/me", get(auth_handlers::handle_me))
        .nest("/api/v1/students", student_routes)
        .nest("/api/v1/faculty", faculty_routes)
        .nest("/api/v1/departments", department_routes)
        .nest("/api/v1/courses", course_routes)
        .nest("/api/v1/subjects", subject_routes)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_auth::require_auth,
        ));

    // --- Router Final ---
    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .with_state(app_state)
}
