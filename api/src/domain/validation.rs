//! Field validation
//!
//! Rules shared by create and update payloads. Every check records a
//! field-level message instead of failing fast, so a single 422 response can
//! list every problem with the payload.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::DomainError;

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All field errors found in one payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-field error, for checks that span more than one payload
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// Whether `field` was rejected
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

/// Collects field errors for one payload
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a check; returns the checked value on success
    pub fn check<T>(&mut self, field: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.errors.add(field, message);
                None
            }
        }
    }

    /// Character-count bounds, inclusive
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) {
        self.check(field, check_length(value, min, max));
    }

    /// Optional values are only bounded when present
    pub fn max_length(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(value) = value {
            self.check(field, check_length(value, 0, max));
        }
    }

    pub fn finish(self) -> Result<(), DomainError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.errors))
        }
    }
}

pub fn check_length(value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = value.chars().count();
    if min == max && len != min {
        return Err(format!("Deve ter exatamente {} caracteres", min));
    }
    if len < min || len > max {
        return Err(if min == 0 {
            format!("Deve ter no máximo {} caracteres", max)
        } else {
            format!("Deve ter entre {} e {} caracteres", min, max)
        });
    }
    Ok(())
}

/// CNPJ: exactly 14 ASCII digits, no punctuation
pub fn validate_cnpj(value: &str) -> Result<(), String> {
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err("CNPJ deve conter apenas números".to_string());
    }
    if value.len() != 14 {
        return Err("CNPJ deve ter 14 dígitos".to_string());
    }
    Ok(())
}

/// Normalize any phone with 10 (landline) or 11 (mobile) digits including
/// the area code to `(DD) NNNN-NNNN` / `(DD) NNNNN-NNNN`
pub fn normalize_telefone(value: &str) -> Result<String, String> {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    let (ddd, number) = match digits.len() {
        10 => (&digits[..2], format!("{}-{}", &digits[2..6], &digits[6..])),
        11 => (&digits[..2], format!("{}-{}", &digits[2..7], &digits[7..])),
        _ => return Err("Telefone deve ter 10 ou 11 dígitos incluindo DDD".to_string()),
    };
    Ok(format!("({}) {}", ddd, number))
}

fn telefone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\(\d{2}\)\s\d{4,5}-\d{4}$").expect("phone pattern is valid"))
}

/// Already-formatted phone, as accepted for mantenedoras
pub fn validate_telefone_formatado(value: &str) -> Result<(), String> {
    if telefone_regex().is_match(value) {
        Ok(())
    } else {
        Err("Formato de telefone inválido. Use: (XX) XXXX-XXXX ou (XX) XXXXX-XXXX".to_string())
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email pattern is valid")
    })
}

pub fn validate_email(value: &str) -> Result<(), String> {
    if email_regex().is_match(value) {
        Ok(())
    } else {
        Err("Email inválido".to_string())
    }
}

/// CEP with optional `-`, `.` or spaces, stored as 8 digits
pub fn normalize_cep(value: &str) -> Result<String, String> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '-' | '.' | ' '))
        .collect();
    if cleaned.len() == 8 && cleaned.chars().all(|c| c.is_ascii_digit()) {
        Ok(cleaned)
    } else {
        Err("CEP deve ter 8 dígitos".to_string())
    }
}

pub fn validate_latitude(value: f64) -> Result<(), String> {
    if (-90.0..=90.0).contains(&value) {
        Ok(())
    } else {
        Err("Latitude deve estar entre -90 e 90".to_string())
    }
}

pub fn validate_longitude(value: f64) -> Result<(), String> {
    if (-180.0..=180.0).contains(&value) {
        Ok(())
    } else {
        Err("Longitude deve estar entre -180 e 180".to_string())
    }
}

/// Cartão Nacional de Saúde: 15 digits
pub fn validate_cns(value: &str) -> Result<(), String> {
    if value.len() == 15 && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err("CNS deve ter 15 dígitos".to_string())
    }
}
