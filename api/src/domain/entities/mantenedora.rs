//! Mantenedora domain entity
//!
//! The legal entity (identified by CNPJ) that sponsors one or more health
//! facilities. Deleting it removes every facility it sponsors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{nullable, Record};
use crate::domain::validation::{validate_cnpj, validate_telefone_formatado, Validator};
use crate::error::DomainError;

record_id!(
    /// Unique identifier for a mantenedora
    MantenedoraId
);

/// Sponsoring organization of health facilities
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mantenedora {
    pub id: MantenedoraId,
    pub cnpj_mantenedora: String,
    pub nome_razao_social_mantenedora: String,
    pub numero_telefone_mantenedora: Option<String>,
    pub codigo_banco: String,
    pub numero_agencia: String,
    pub numero_conta_corrente: String,
    pub data_criacao_mantenedora: DateTime<Utc>,
}

impl Record for Mantenedora {
    type Id = MantenedoraId;
    type New = NewMantenedora;
    type Patch = MantenedoraPatch;
    type Filter = MantenedoraFilter;

    const NOT_FOUND: &'static str = "Mantenedora não encontrada";

    fn id(&self) -> MantenedoraId {
        self.id
    }
}

/// Data needed to create a new mantenedora
#[derive(Debug, Clone, Deserialize)]
pub struct NewMantenedora {
    pub cnpj_mantenedora: String,
    pub nome_razao_social_mantenedora: String,
    #[serde(default)]
    pub numero_telefone_mantenedora: Option<String>,
    pub codigo_banco: String,
    pub numero_agencia: String,
    pub numero_conta_corrente: String,
    /// Defaults to the insertion time
    #[serde(default)]
    pub data_criacao_mantenedora: Option<DateTime<Utc>>,
}

impl NewMantenedora {
    pub fn validated(self) -> Result<Self, DomainError> {
        let mut v = Validator::new();
        v.check("cnpj_mantenedora", validate_cnpj(&self.cnpj_mantenedora));
        v.length(
            "nome_razao_social_mantenedora",
            &self.nome_razao_social_mantenedora,
            3,
            255,
        );
        if let Some(telefone) = &self.numero_telefone_mantenedora {
            v.check(
                "numero_telefone_mantenedora",
                validate_telefone_formatado(telefone),
            );
        }
        v.length("codigo_banco", &self.codigo_banco, 3, 3);
        v.length("numero_agencia", &self.numero_agencia, 1, 10);
        v.length("numero_conta_corrente", &self.numero_conta_corrente, 1, 20);
        v.finish()?;
        Ok(self)
    }
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MantenedoraPatch {
    pub cnpj_mantenedora: Option<String>,
    pub nome_razao_social_mantenedora: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub numero_telefone_mantenedora: Option<Option<String>>,
    pub codigo_banco: Option<String>,
    pub numero_agencia: Option<String>,
    pub numero_conta_corrente: Option<String>,
}

impl MantenedoraPatch {
    pub fn validated(self) -> Result<Self, DomainError> {
        let mut v = Validator::new();
        if let Some(cnpj) = &self.cnpj_mantenedora {
            v.check("cnpj_mantenedora", validate_cnpj(cnpj));
        }
        if let Some(nome) = &self.nome_razao_social_mantenedora {
            v.length("nome_razao_social_mantenedora", nome, 3, 255);
        }
        if let Some(Some(telefone)) = &self.numero_telefone_mantenedora {
            v.check(
                "numero_telefone_mantenedora",
                validate_telefone_formatado(telefone),
            );
        }
        if let Some(banco) = &self.codigo_banco {
            v.length("codigo_banco", banco, 3, 3);
        }
        if let Some(agencia) = &self.numero_agencia {
            v.length("numero_agencia", agencia, 1, 10);
        }
        if let Some(conta) = &self.numero_conta_corrente {
            v.length("numero_conta_corrente", conta, 1, 20);
        }
        v.finish()?;
        Ok(self)
    }
}

/// Listing filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MantenedoraFilter {
    /// Exact CNPJ
    pub cnpj: Option<String>,
    /// Case-insensitive substring of the legal name
    pub nome: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_mantenedora() -> NewMantenedora {
        NewMantenedora {
            cnpj_mantenedora: "12345678901234".to_string(),
            nome_razao_social_mantenedora: "Mantenedora LTDA".to_string(),
            numero_telefone_mantenedora: Some("(85) 3219-1234".to_string()),
            codigo_banco: "001".to_string(),
            numero_agencia: "1234".to_string(),
            numero_conta_corrente: "123456-7".to_string(),
            data_criacao_mantenedora: None,
        }
    }

    fn rejected_fields(result: Result<impl std::fmt::Debug, DomainError>) -> Vec<String> {
        match result {
            Err(DomainError::Validation(errors)) => {
                errors.fields().iter().map(|e| e.field.clone()).collect()
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(new_mantenedora().validated().is_ok());
    }

    #[test]
    fn rejects_bad_cnpj_and_bank_code() {
        let mut new = new_mantenedora();
        new.cnpj_mantenedora = "123".to_string();
        new.codigo_banco = "1".to_string();

        let fields = rejected_fields(new.validated());
        assert_eq!(fields, vec!["cnpj_mantenedora", "codigo_banco"]);
    }

    #[test]
    fn rejects_unformatted_phone() {
        let mut new = new_mantenedora();
        new.numero_telefone_mantenedora = Some("8532191234".to_string());

        let fields = rejected_fields(new.validated());
        assert_eq!(fields, vec!["numero_telefone_mantenedora"]);
    }

    #[test]
    fn phone_is_optional() {
        let mut new = new_mantenedora();
        new.numero_telefone_mantenedora = None;
        assert!(new.validated().is_ok());
    }

    #[test]
    fn patch_only_checks_present_fields() {
        let patch = MantenedoraPatch {
            nome_razao_social_mantenedora: Some("Nova Razão".to_string()),
            ..Default::default()
        };
        assert!(patch.validated().is_ok());

        let patch = MantenedoraPatch {
            numero_agencia: Some("12345678901".to_string()),
            ..Default::default()
        };
        assert_eq!(rejected_fields(patch.validated()), vec!["numero_agencia"]);
    }

    #[test]
    fn patch_accepts_clearing_phone() {
        let patch: MantenedoraPatch =
            serde_json::from_str(r#"{"numero_telefone_mantenedora": null}"#).unwrap();
        assert_eq!(patch.numero_telefone_mantenedora, Some(None));
        assert!(patch.validated().is_ok());
    }

    #[test]
    fn new_mantenedora_from_json_defaults_optional_fields() {
        let json = r#"{
            "cnpj_mantenedora": "12345678901234",
            "nome_razao_social_mantenedora": "Mantenedora LTDA",
            "codigo_banco": "001",
            "numero_agencia": "1234",
            "numero_conta_corrente": "123456-7"
        }"#;
        let new: NewMantenedora = serde_json::from_str(json).unwrap();
        assert!(new.numero_telefone_mantenedora.is_none());
        assert!(new.data_criacao_mantenedora.is_none());
    }

    #[test]
    fn id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&MantenedoraId(7)).unwrap(), "7");
    }
}
