// src/web/mod.rs
pub mod auth_handlers;
pub mod course_handlers;
pub mod department_handlers;
pub mod envelope;
pub mod extract;
pub mod faculty_handlers;
pub mod mw_admin;
pub mod mw_auth;
pub mod routes;
pub mod student_handlers;
pub mod subject_handlers;
