// src/models/course.rs
use crate::error::{AppError, AppResult, FieldErrors};
use crate::models::{check_choice, require_text};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEGREES: &[&str] = &["Diploma", "UG", "PG", "PhD"];

/// Curso com o nome do departamento anexado para exibição.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    pub id: String,
    pub name: String,
    pub code: String,
    pub department_id: String,
    pub degree: String,
    pub duration: i64,
    pub total_semesters: i64,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub department_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoursePayload {
    pub name: Option<String>,
    pub code: Option<String>,
    pub department_id: Option<String>,
    pub degree: Option<String>,
    pub duration: Option<i64>,
    pub total_semesters: Option<i64>,
    pub description: Option<String>,
}

#[derive(Debug)]
pub struct NewCourse {
    pub name: String,
    pub code: String,
    pub department_id: String,
    pub degree: String,
    pub duration: i64,
    pub total_semesters: i64,
    pub description: Option<String>,
}

impl CreateCoursePayload {
    pub fn validate(&self) -> AppResult<NewCourse> {
        let mut errors = FieldErrors::new();

        let name = require_text(&mut errors, "name", self.name.as_deref());
        let code = require_text(&mut errors, "code", self.code.as_deref()).to_uppercase();
        let department_id =
            require_text(&mut errors, "departmentId", self.department_id.as_deref());
        let degree = require_text(&mut errors, "degree", self.degree.as_deref());
        if !degree.is_empty() {
            check_choice(&mut errors, "degree", Some(degree.as_str()), DEGREES);
        }

        let duration = match self.duration {
            Some(d) if d >= 1 => d,
            Some(_) => {
                errors.insert("duration".to_string(), "Deve ser pelo menos 1.".to_string());
                0
            }
            None => {
                errors.insert("duration".to_string(), "Campo obrigatório.".to_string());
                0
            }
        };
        let total_semesters = match self.total_semesters {
            Some(t) if t >= 1 => t,
            Some(_) => {
                errors.insert(
                    "totalSemesters".to_string(),
                    "Deve ser pelo menos 1.".to_string(),
                );
                0
            }
            None => {
                errors.insert("totalSemesters".to_string(), "Campo obrigatório.".to_string());
                0
            }
        };

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(NewCourse {
            name,
            code,
            department_id,
            degree,
            duration,
            total_semesters,
            description: self.description.clone(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoursePayload {
    pub name: Option<String>,
    pub code: Option<String>,
    pub department_id: Option<String>,
    pub degree: Option<String>,
    pub duration: Option<i64>,
    pub total_semesters: Option<i64>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateCoursePayload {
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
        check_choice(&mut errors, "degree", self.degree.as_deref(), DEGREES);
        if matches!(self.duration, Some(d) if d < 1) {
            errors.insert("duration".to_string(), "Deve ser pelo menos 1.".to_string());
        }
        if matches!(self.total_semesters, Some(t) if t < 1) {
            errors.insert(
                "totalSemesters".to_string(),
                "Deve ser pelo menos 1.".to_string(),
            );
        }

        if errors.is_empty() {
            Ok(self)
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_payload() -> CreateCoursePayload {
        CreateCoursePayload {
            name: Some("B.Tech CS".to_string()),
            code: Some("btcs".to_string()),
            department_id: Some("dep-1".to_string()),
            degree: Some("UG".to_string()),
            duration: Some(4),
            total_semesters: Some(8),
            description: None,
        }
    }

    #[test]
    fn curso_valido_normaliza_codigo() {
        let course = base_payload().validate().expect("payload válido");
        assert_eq!(course.code, "BTCS");
        assert_eq!(course.duration, 4);
    }

    #[test]
    fn grau_desconhecido_e_rejeitado() {
        let mut payload = base_payload();
        payload.degree = Some("Mestrado".to_string());
        match payload.validate() {
            Err(AppError::Validation(errors)) => assert!(errors.contains_key("degree")),
            other => panic!("esperava erro de validação, obtive {:?}", other),
        }
    }

    #[test]
    fn duracao_invalida_e_rejeitada() {
        let mut payload = base_payload();
        payload.duration = Some(0);
        payload.total_semesters = None;
        match payload.validate() {
            Err(AppError::Validation(errors)) => {
                assert!(errors.contains_key("duration"));
                assert!(errors.contains_key("totalSemesters"));
            }
            other => panic!("esperava erro de validação, obtive {:?}", other),
        }
    }
}
