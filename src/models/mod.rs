// src/models/mod.rs
pub mod course;
pub mod department;
pub mod faculty;
pub mod student;
pub mod subject;
pub mod user;

use serde::Deserialize;

// Limites da paginação. O limit é sempre limitado a 100 para impedir que um
// cliente peça a tabela inteira numa só página.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Parâmetros de query comuns a todos os endpoints de listagem.
/// Os filtros de igualdade que não se aplicam à entidade são simplesmente ignorados.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub department_id: Option<String>,
    pub course_id: Option<String>,
    pub semester: Option<i64>,
    pub status: Option<String>,
}

impl ListParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }

    /// Padrão LIKE para busca por substring, case-insensitive.
    /// `None` quando não há termo de busca útil. Os curingas do LIKE são
    /// escapados para a busca ser sempre literal; as queries usam ESCAPE '\'.
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                let escaped = s
                    .to_lowercase()
                    .replace('\\', "\\\\")
                    .replace('%', "\\%")
                    .replace('_', "\\_");
                format!("%{}%", escaped)
            })
    }
}

// --- Helpers de validação partilhados pelos payloads ---

use crate::error::FieldErrors;

/// Exige um campo textual não vazio; regista o erro e devolve string vazia
/// quando falta (o chamador só usa o valor se o mapa de erros ficar vazio).
pub(crate) fn require_text(errors: &mut FieldErrors, field: &str, value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v.to_string(),
        None => {
            errors.insert(field.to_string(), "Campo obrigatório.".to_string());
            String::new()
        }
    }
}

/// Valida um campo opcional contra uma lista fechada de valores.
pub(crate) fn check_choice(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    allowed: &[&str],
) {
    if let Some(v) = value {
        if !allowed.contains(&v) {
            errors.insert(
                field.to_string(),
                format!("Valor inválido; esperado um de {:?}.", allowed),
            );
        }
    }
}

/// Verificação estrutural mínima de email; o resto fica para o servidor de correio.
pub(crate) fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        _ => false,
    }
}
