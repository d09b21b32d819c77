// src/models/student.rs
use crate::error::{AppError, AppResult, FieldErrors};
use crate::models::user::{validate_gender, UserProfilePatch, MIN_PASSWORD_LEN};
use crate::models::{check_choice, is_valid_email, require_text};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// 'active' é o único estado reversível; os restantes são terminais.
pub const STUDENT_STATUSES: &[&str] = &["active", "graduated", "dropout", "transferred"];

// Senha atribuída quando o admin cria o estudante sem indicar uma.
pub const DEFAULT_STUDENT_PASSWORD: &str = "student123";

/// Estudante com os resumos do User, departamento e curso anexados
/// (desnormalizado para exibição, nunca para armazenamento).
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetail {
    pub id: String,
    pub user_id: String,
    pub admission_number: String,
    pub admission_date: NaiveDate,
    pub course_id: String,
    pub department_id: String,
    pub semester: i64,
    pub section: String,
    pub batch: String,
    pub roll_number: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub department_name: String,
    pub course_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentPayload {
    // Conta de acesso
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    // Dados académicos
    pub admission_number: Option<String>,
    pub admission_date: Option<NaiveDate>,
    pub course_id: Option<String>,
    pub department_id: Option<String>,
    pub semester: Option<i64>,
    pub section: Option<String>,
    pub batch: Option<String>,
    pub roll_number: Option<String>,
}

/// Estudante validado e com defaults aplicados, pronto para persistir.
#[derive(Debug)]
pub struct NewStudent {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub admission_number: String,
    pub admission_date: NaiveDate,
    pub course_id: String,
    pub department_id: String,
    pub semester: i64,
    pub section: String,
    pub batch: String,
    pub roll_number: String,
}

impl CreateStudentPayload {
    pub fn validate(&self) -> AppResult<NewStudent> {
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

        let admission_number =
            require_text(&mut errors, "admissionNumber", self.admission_number.as_deref());
        let course_id = require_text(&mut errors, "courseId", self.course_id.as_deref());
        let department_id =
            require_text(&mut errors, "departmentId", self.department_id.as_deref());

        let semester = match self.semester {
            Some(s) if (1..=12).contains(&s) => s,
            Some(_) => {
                errors.insert("semester".to_string(), "Deve estar entre 1 e 12.".to_string());
                0
            }
            None => {
                errors.insert("semester".to_string(), "Campo obrigatório.".to_string());
                0
            }
        };

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(NewStudent {
            email,
            password: self
                .password
                .clone()
                .unwrap_or_else(|| DEFAULT_STUDENT_PASSWORD.to_string()),
            first_name,
            last_name,
            phone: self.phone.clone(),
            date_of_birth: self.date_of_birth,
            gender: self.gender.clone(),
            admission_number: admission_number.clone(),
            admission_date: self
                .admission_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            course_id,
            department_id,
            semester,
            section: self
                .section
                .as_deref()
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "A".to_string()),
            batch: self
                .batch
                .clone()
                .unwrap_or_else(|| Utc::now().format("%Y").to_string()),
            roll_number: self.roll_number.clone().unwrap_or(admission_number),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentPayload {
    // Campos do User (propagados na mesma transação)
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    // Campos próprios do Student
    pub course_id: Option<String>,
    pub department_id: Option<String>,
    pub semester: Option<i64>,
    pub section: Option<String>,
    pub batch: Option<String>,
    pub roll_number: Option<String>,
    pub status: Option<String>,
}

impl UpdateStudentPayload {
    pub fn validate(mut self) -> AppResult<Self> {
        let mut errors = FieldErrors::new();

        if matches!(&self.first_name, Some(v) if v.trim().is_empty()) {
            errors.insert("firstName".to_string(), "Não pode ser vazio.".to_string());
        }
        if matches!(&self.last_name, Some(v) if v.trim().is_empty()) {
            errors.insert("lastName".to_string(), "Não pode ser vazio.".to_string());
        }
        if matches!(self.semester, Some(s) if !(1..=12).contains(&s)) {
            errors.insert("semester".to_string(), "Deve estar entre 1 e 12.".to_string());
        }
        check_choice(&mut errors, "status", self.status.as_deref(), STUDENT_STATUSES);
        if let Some(section) = &self.section {
            self.section = Some(section.trim().to_uppercase());
        }

        if errors.is_empty() {
            Ok(self)
        } else {
            Err(AppError::Validation(errors))
        }
    }

    /// Extrai o sub-patch dos campos que pertencem ao User ligado.
    pub fn user_patch(&self) -> UserProfilePatch {
        UserProfilePatch {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            date_of_birth: self.date_of_birth,
        }
    }
}
