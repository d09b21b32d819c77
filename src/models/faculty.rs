// src/models/faculty.rs
use crate::error::{AppError, AppResult, FieldErrors};
use crate::models::user::{validate_gender, UserProfilePatch, MIN_PASSWORD_LEN};
use crate::models::{check_choice, is_valid_email, require_text};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const FACULTY_STATUSES: &[&str] = &["active", "on_leave", "resigned"];
pub const DESIGNATIONS: &[&str] = &[
    "Professor",
    "Associate Professor",
    "Assistant Professor",
    "Lecturer",
];

pub const DEFAULT_FACULTY_PASSWORD: &str = "faculty123";

/// Docente com os resumos do User e do departamento anexados.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyDetail {
    pub id: String,
    pub user_id: String,
    pub employee_id: String,
    pub joining_date: NaiveDate,
    pub designation: String,
    pub department_id: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub department_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFacultyPayload {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub employee_id: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub designation: Option<String>,
    pub department_id: Option<String>,
}

#[derive(Debug)]
pub struct NewFaculty {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub employee_id: String,
    pub joining_date: NaiveDate,
    pub designation: String,
    pub department_id: String,
}

impl CreateFacultyPayload {
    pub fn validate(&self) -> AppResult<NewFaculty> {
        let mut errors = FieldErrors::new();

        let email = require_text(&mut errors, "email", self.email.as_deref()).to_lowercase();
        if !email.is_empty() && !is_valid_email(&email) {
            errors.insert("email".to_string(), "Email inválido.".to_string());
        }
        if let Some(password) = &self.password {
            if password.len() < MIN_PASSWORD_LEN {
                errors.insert(
                    "password".to_string(),
                    format!("A senha deve ter pelo menos {} caracteres.", MIN_PASSWORD_LEN),
                );
            }
        }

        let first_name = require_text(&mut errors, "firstName", self.first_name.as_deref());
        let last_name = require_text(&mut errors, "lastName", self.last_name.as_deref());
        validate_gender(&mut errors, self.gender.as_deref());

        let employee_id = require_text(&mut errors, "employeeId", self.employee_id.as_deref());
        let designation = require_text(&mut errors, "designation", self.designation.as_deref());
        if !designation.is_empty() {
            check_choice(&mut errors, "designation", Some(designation.as_str()), DESIGNATIONS);
        }
        let department_id =
            require_text(&mut errors, "departmentId", self.department_id.as_deref());

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(NewFaculty {
            email,
            password: self
                .password
                .clone()
                .unwrap_or_else(|| DEFAULT_FACULTY_PASSWORD.to_string()),
            first_name,
            last_name,
            phone: self.phone.clone(),
            date_of_birth: self.date_of_birth,
            gender: self.gender.clone(),
            employee_id,
            joining_date: self
                .joining_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            designation,
            department_id,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFacultyPayload {
    // Campos do User (propagados na mesma transação)
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    // Campos próprios do Faculty
    pub designation: Option<String>,
    pub department_id: Option<String>,
    pub status: Option<String>,
}

impl UpdateFacultyPayload {
    pub fn validate(self) -> AppResult<Self> {
        let mut errors = FieldErrors::new();

        if matches!(&self.first_name, Some(v) if v.trim().is_empty()) {
            errors.insert("firstName".to_string(), "Não pode ser vazio.".to_string());
        }
        if matches!(&self.last_name, Some(v) if v.trim().is_empty()) {
            errors.insert("lastName".to_string(), "Não pode ser vazio.".to_string());
        }
        check_choice(&mut errors, "designation", self.designation.as_deref(), DESIGNATIONS);
        check_choice(&mut errors, "status", self.status.as_deref(), FACULTY_STATUSES);

        if errors.is_empty() {
            Ok(self)
        } else {
            Err(AppError::Validation(errors))
        }
    }

    pub fn user_patch(&self) -> UserProfilePatch {
        UserProfilePatch {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            date_of_birth: self.date_of_birth,
        }
    }
}
