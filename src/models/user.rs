// src/models/user.rs
use crate::error::{AppError, AppResult, FieldErrors};
use crate::models::{check_choice, is_valid_email, require_text};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const GENDERS: &[&str] = &["male", "female", "other"];

// Mesma régua para o registo público e para as criações feitas pelo admin.
pub const MIN_PASSWORD_LEN: usize = 6;

// Representa um utilizador lido da tabela 'users'
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub last_login: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Versão do User segura para respostas da API: nunca inclui o hash da senha.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: String,
    pub email: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub last_login: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<User> for UserPublic {
    fn from(u: User) -> Self {
        UserPublic {
            id: u.id,
            email: u.email,
            role: u.role,
            first_name: u.first_name,
            last_name: u.last_name,
            phone: u.phone,
            date_of_birth: u.date_of_birth,
            gender: u.gender,
            is_active: u.is_active,
            is_verified: u.is_verified,
            last_login: u.last_login,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

// Dados do formulário de login
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

// Auto-registo: cria sempre um utilizador com role 'student', não verificado.
#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Registo validado e normalizado, pronto para o serviço.
#[derive(Debug)]
pub struct NewRegistration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegisterPayload {
    pub fn validate(&self) -> AppResult<NewRegistration> {
        let mut errors = FieldErrors::new();

        let name = require_text(&mut errors, "name", self.name.as_deref());
        let email = require_text(&mut errors, "email", self.email.as_deref()).to_lowercase();
        let password = require_text(&mut errors, "password", self.password.as_deref());

        if !email.is_empty() && !is_valid_email(&email) {
            errors.insert("email".to_string(), "Email inválido.".to_string());
        }
        if !password.is_empty() && password.len() < MIN_PASSWORD_LEN {
            errors.insert(
                "password".to_string(),
                format!("A senha deve ter pelo menos {} caracteres.", MIN_PASSWORD_LEN),
            );
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        // O registo recebe um único campo 'name'; divide no primeiro espaço.
        let mut parts = name.splitn(2, ' ');
        let first_name = parts.next().unwrap_or_default().to_string();
        let last_name = parts.next().unwrap_or(".").to_string();

        Ok(NewRegistration {
            email,
            password,
            first_name,
            last_name,
        })
    }
}

/// Claims embutidas no cookie de sessão assinado. Não há sessão no servidor:
/// a integridade vem da assinatura, a validade do campo `exp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub uid: String,
    pub role: String,
    pub exp: i64,
}

impl SessionClaims {
    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }
}

/// Sub-patch dos campos do perfil que pertencem ao User e chegam via
/// update de Student/Faculty. A propagação acontece na mesma transação.
#[derive(Debug, Default)]
pub struct UserProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl UserProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.date_of_birth.is_none()
    }
}

pub(crate) fn validate_gender(errors: &mut FieldErrors, gender: Option<&str>) {
    check_choice(errors, "gender", gender, GENDERS);
}
