// src/models/department.rs
use crate::error::{AppError, AppResult, FieldErrors};
use crate::models::require_text;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Departamento com o resumo do chefe de departamento (HOD) anexado.
/// Os campos hod_* vêm de um LEFT JOIN e só existem quando há HOD definido.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDetail {
    pub id: String,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub hod_id: Option<String>,
    pub established_year: Option<i64>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub hod_first_name: Option<String>,
    pub hod_last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentPayload {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub hod_id: Option<String>,
    pub established_year: Option<i64>,
}

#[derive(Debug)]
pub struct NewDepartment {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub hod_id: Option<String>,
    pub established_year: Option<i64>,
}

impl CreateDepartmentPayload {
    pub fn validate(&self) -> AppResult<NewDepartment> {
        let mut errors = FieldErrors::new();

        let name = require_text(&mut errors, "name", self.name.as_deref());
        // Códigos são sempre guardados em maiúsculas (a busca continua
        // case-insensitive do lado da query).
        let code = require_text(&mut errors, "code", self.code.as_deref()).to_uppercase();

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(NewDepartment {
            name,
            code,
            description: self.description.clone(),
            hod_id: self.hod_id.clone(),
            established_year: self.established_year,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartmentPayload {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub hod_id: Option<String>,
    pub established_year: Option<i64>,
    pub is_active: Option<bool>,
}

impl UpdateDepartmentPayload {
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

        if errors.is_empty() {
            Ok(self)
        } else {
            Err(AppError::Validation(errors))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.code.is_none()
            && self.description.is_none()
            && self.hod_id.is_none()
            && self.established_year.is_none()
            && self.is_active.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criacao_normaliza_codigo() {
        let payload = CreateDepartmentPayload {
            name: Some("Computer Science".to_string()),
            code: Some("  cs ".to_string()),
            description: None,
            hod_id: None,
            established_year: Some(1998),
        };
        let dept = payload.validate().expect("payload válido");
        assert_eq!(dept.code, "CS");
        assert_eq!(dept.name, "Computer Science");
    }

    #[test]
    fn criacao_sem_nome_e_codigo_falha() {
        let payload = CreateDepartmentPayload {
            name: None,
            code: Some("   ".to_string()),
            description: None,
            hod_id: None,
            established_year: None,
        };
        match payload.validate() {
            Err(AppError::Validation(errors)) => {
                assert!(errors.contains_key("name"));
                assert!(errors.contains_key("code"));
            }
            other => panic!("esperava erro de validação, obtive {:?}", other),
        }
    }
}
