// src/models/subject.rs
use crate::error::{AppError, AppResult, FieldErrors};
use crate::models::{check_choice, require_text};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const SUBJECT_TYPES: &[&str] = &["theory", "practical", "both"];

/// Disciplina com o resumo do curso anexado.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDetail {
    pub id: String,
    pub name: String,
    pub code: String,
    pub course_id: String,
    pub semester: i64,
    pub credits: i64,
    #[serde(rename = "type")]
    pub subject_type: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub course_name: String,
    pub course_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubjectPayload {
    pub name: Option<String>,
    pub code: Option<String>,
    pub course_id: Option<String>,
    pub semester: Option<i64>,
    pub credits: Option<i64>,
    #[serde(rename = "type")]
    pub subject_type: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug)]
pub struct NewSubject {
    pub name: String,
    pub code: String,
    pub course_id: String,
    pub semester: i64,
    pub credits: i64,
    pub subject_type: String,
    pub description: Option<String>,
}

impl CreateSubjectPayload {
    pub fn validate(&self) -> AppResult<NewSubject> {
        let mut errors = FieldErrors::new();

        let name = require_text(&mut errors, "name", self.name.as_deref());
        let code = require_text(&mut errors, "code", self.code.as_deref()).to_uppercase();
        let course_id = require_text(&mut errors, "courseId", self.course_id.as_deref());

        let semester = match self.semester {
            Some(s) if s >= 1 => s,
            Some(_) => {
                errors.insert("semester".to_string(), "Deve ser pelo menos 1.".to_string());
                0
            }
            None => {
                errors.insert("semester".to_string(), "Campo obrigatório.".to_string());
                0
            }
        };
        let credits = match self.credits {
            Some(c) if c >= 1 => c,
            Some(_) => {
                errors.insert("credits".to_string(), "Deve ser pelo menos 1.".to_string());
                0
            }
            None => {
                errors.insert("credits".to_string(), "Campo obrigatório.".to_string());
                0
            }
        };

        check_choice(&mut errors, "type", self.subject_type.as_deref(), SUBJECT_TYPES);

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(NewSubject {
            name,
            code,
            course_id,
            semester,
            credits,
            subject_type: self
                .subject_type
                .clone()
                .unwrap_or_else(|| "theory".to_string()),
            description: self.description.clone(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubjectPayload {
    pub name: Option<String>,
    pub code: Option<String>,
    pub course_id: Option<String>,
    pub semester: Option<i64>,
    pub credits: Option<i64>,
    #[serde(rename = "type")]
    pub subject_type: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateSubjectPayload {
    pub fn validate(mut self) -> AppResult<Self> {
        let mut errors = FieldErrors::new();

        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                errors.insert("name".to_string(), "Não pode ser vazio.".to_string());
            }
        }
        if let Some(code) = &self.code {
            if code.trim().is_empty() {
                errors.insert("code".to_string(), "Não pode ser vazio.".to_string());
            } else {
                self.code = Some(code.trim().to_uppercase());
            }
        }
        if matches!(self.semester, Some(s) if s < 1) {
            errors.insert("semester".to_string(), "Deve ser pelo menos 1.".to_string());
        }
        if matches!(self.credits, Some(c) if c < 1) {
            errors.insert("credits".to_string(), "Deve ser pelo menos 1.".to_string());
        }
        check_choice(&mut errors, "type", self.subject_type.as_deref(), SUBJECT_TYPES);

        if errors.is_empty() {
            Ok(self)
        } else {
            Err(AppError::Validation(errors))
        }
    }
}
