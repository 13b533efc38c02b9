//! Profissional domain entity

use serde::{Deserialize, Serialize};

use super::{nullable, Record};
use crate::domain::validation::{validate_cns, Validator};
use crate::error::DomainError;

record_id!(
    /// Unique identifier for a profissional
    ProfissionalId
);

/// A health professional, identified by their SUS code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profissional {
    pub id: ProfissionalId,
    pub codigo_profissional_sus: String,
    pub nome_profissional: String,
    pub codigo_cns: Option<String>,
    pub situacao_profissional_cadsus: Option<String>,
}

impl Record for Profissional {
    type Id = ProfissionalId;
    type New = NewProfissional;
    type Patch = ProfissionalPatch;
    type Filter = ProfissionalFilter;

    const NOT_FOUND: &'static str = "Profissional não encontrado";

    fn id(&self) -> ProfissionalId {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProfissional {
    pub codigo_profissional_sus: String,
    pub nome_profissional: String,
    #[serde(default)]
    pub codigo_cns: Option<String>,
    #[serde(default)]
    pub situacao_profissional_cadsus: Option<String>,
}

impl NewProfissional {
    pub fn validated(self) -> Result<Self, DomainError> {
        let mut v = Validator::new();
        v.length("codigo_profissional_sus", &self.codigo_profissional_sus, 1, 20);
        v.length("nome_profissional", &self.nome_profissional, 3, 255);
        if let Some(cns) = &self.codigo_cns {
            v.check("codigo_cns", validate_cns(cns));
        }
        v.max_length(
            "situacao_profissional_cadsus",
            self.situacao_profissional_cadsus.as_deref(),
            20,
        );
        v.finish()?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfissionalPatch {
    pub codigo_profissional_sus: Option<String>,
    pub nome_profissional: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub codigo_cns: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub situacao_profissional_cadsus: Option<Option<String>>,
}

impl ProfissionalPatch {
    pub fn validated(self) -> Result<Self, DomainError> {
        let mut v = Validator::new();
        if let Some(codigo) = &self.codigo_profissional_sus {
            v.length("codigo_profissional_sus", codigo, 1, 20);
        }
        if let Some(nome) = &self.nome_profissional {
            v.length("nome_profissional", nome, 3, 255);
        }
        if let Some(Some(cns)) = &self.codigo_cns {
            v.check("codigo_cns", validate_cns(cns));
        }
        if let Some(situacao) = &self.situacao_profissional_cadsus {
            v.max_length("situacao_profissional_cadsus", situacao.as_deref(), 20);
        }
        v.finish()?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfissionalFilter {
    pub codigo_profissional_sus: Option<String>,
    pub codigo_cns: Option<String>,
    /// Case-insensitive substring of the name
    pub nome: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_profissional() -> NewProfissional {
        NewProfissional {
            codigo_profissional_sus: "980016281234567".to_string(),
            nome_profissional: "Maria da Silva".to_string(),
            codigo_cns: Some("123456789012345".to_string()),
            situacao_profissional_cadsus: Some("N".to_string()),
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(new_profissional().validated().is_ok());
    }

    #[test]
    fn rejects_short_name_and_bad_cns() {
        let mut new = new_profissional();
        new.nome_profissional = "Jo".to_string();
        new.codigo_cns = Some("1234".to_string());

        match new.validated() {
            Err(DomainError::Validation(errors)) => {
                assert!(errors.has("nome_profissional"));
                assert!(errors.has("codigo_cns"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_empty_sus_code() {
        let mut new = new_profissional();
        new.codigo_profissional_sus = String::new();
        assert!(new.validated().is_err());
    }

    #[test]
    fn patch_allows_clearing_cns() {
        let patch: ProfissionalPatch = serde_json::from_str(r#"{"codigo_cns": null}"#).unwrap();
        assert_eq!(patch.codigo_cns, Some(None));
        assert!(patch.validated().is_ok());
    }
}
