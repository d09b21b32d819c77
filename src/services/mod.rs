// src/services/mod.rs
pub mod auth_service;
pub mod course_service;
pub mod department_service;
pub mod faculty_service;
pub mod student_service;
pub mod subject_service;
pub mod user_service;
