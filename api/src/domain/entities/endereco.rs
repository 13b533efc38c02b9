//! Endereco domain entity
//!
//! Street address of a facility. At most one per estabelecimento.

use serde::{Deserialize, Serialize};

use super::estabelecimento::EstabelecimentoId;
use super::{nullable, Record};
use crate::domain::validation::{normalize_cep, validate_latitude, validate_longitude, Validator};
use crate::error::DomainError;

record_id!(
    /// Unique identifier for an endereco
    EnderecoId
);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Endereco {
    pub id: EnderecoId,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub cep_estabelecimento: String,
    pub bairro: String,
    pub logradouro: String,
    pub numero: String,
    pub complemento: Option<String>,
    pub estabelecimento_id: EstabelecimentoId,
}

impl Record for Endereco {
    type Id = EnderecoId;
    type New = NewEndereco;
    type Patch = EnderecoPatch;
    type Filter = EnderecoFilter;

    const NOT_FOUND: &'static str = "Endereço não encontrado";

    fn id(&self) -> EnderecoId {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEndereco {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub cep_estabelecimento: String,
    pub bairro: String,
    pub logradouro: String,
    pub numero: String,
    #[serde(default)]
    pub complemento: Option<String>,
    pub estabelecimento_id: EstabelecimentoId,
}

impl NewEndereco {
    /// Validate, storing the CEP as bare digits
    pub fn validated(mut self) -> Result<Self, DomainError> {
        let mut v = Validator::new();
        if let Some(lat) = self.latitude {
            v.check("latitude", validate_latitude(lat));
        }
        if let Some(lon) = self.longitude {
            v.check("longitude", validate_longitude(lon));
        }
        if let Some(cep) = v.check("cep_estabelecimento", normalize_cep(&self.cep_estabelecimento)) {
            self.cep_estabelecimento = cep;
        }
        v.length("bairro", &self.bairro, 1, 100);
        v.length("logradouro", &self.logradouro, 1, 255);
        v.length("numero", &self.numero, 1, 10);
        v.max_length("complemento", self.complemento.as_deref(), 100);
        v.finish()?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnderecoPatch {
    #[serde(default, deserialize_with = "nullable")]
    pub latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub longitude: Option<Option<f64>>,
    pub cep_estabelecimento: Option<String>,
    pub bairro: Option<String>,
    pub logradouro: Option<String>,
    pub numero: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub complemento: Option<Option<String>>,
    pub estabelecimento_id: Option<EstabelecimentoId>,
}

impl EnderecoPatch {
    pub fn validated(mut self) -> Result<Self, DomainError> {
        let mut v = Validator::new();
        if let Some(Some(lat)) = self.latitude {
            v.check("latitude", validate_latitude(lat));
        }
        if let Some(Some(lon)) = self.longitude {
            v.check("longitude", validate_longitude(lon));
        }
        if let Some(cep) = &self.cep_estabelecimento {
            if let Some(cep) = v.check("cep_estabelecimento", normalize_cep(cep)) {
                self.cep_estabelecimento = Some(cep);
            }
        }
        if let Some(bairro) = &self.bairro {
            v.length("bairro", bairro, 1, 100);
        }
        if let Some(logradouro) = &self.logradouro {
            v.length("logradouro", logradouro, 1, 255);
        }
        if let Some(numero) = &self.numero {
            v.length("numero", numero, 1, 10);
        }
        if let Some(Some(complemento)) = &self.complemento {
            v.max_length("complemento", Some(complemento), 100);
        }
        v.finish()?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnderecoFilter {
    pub estabelecimento_id: Option<i32>,
    /// Matched after normalization
    pub cep: Option<String>,
    /// Case-insensitive substring
    pub bairro: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_endereco() -> NewEndereco {
        NewEndereco {
            latitude: Some(-3.7319),
            longitude: Some(-38.5267),
            cep_estabelecimento: "60.115-170".to_string(),
            bairro: "Aldeota".to_string(),
            logradouro: "Rua Silva Paulet".to_string(),
            numero: "1200".to_string(),
            complemento: None,
            estabelecimento_id: EstabelecimentoId(1),
        }
    }

    #[test]
    fn cep_is_stored_as_digits() {
        let endereco = new_endereco().validated().unwrap();
        assert_eq!(endereco.cep_estabelecimento, "60115170");
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let mut new = new_endereco();
        new.latitude = Some(-91.0);
        new.longitude = Some(181.0);

        match new.validated() {
            Err(DomainError::Validation(errors)) => {
                assert!(errors.has("latitude"));
                assert!(errors.has("longitude"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_long_numero_and_empty_bairro() {
        let mut new = new_endereco();
        new.numero = "12345678901".to_string();
        new.bairro = String::new();

        match new.validated() {
            Err(DomainError::Validation(errors)) => {
                assert!(errors.has("numero"));
                assert!(errors.has("bairro"));
                assert!(!errors.has("cep_estabelecimento"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn coordinates_are_optional() {
        let mut new = new_endereco();
        new.latitude = None;
        new.longitude = None;
        assert!(new.validated().is_ok());
    }

    #[test]
    fn patch_normalizes_cep_and_clears_coordinates() {
        let patch: EnderecoPatch =
            serde_json::from_str(r#"{"cep_estabelecimento": "60115 170", "latitude": null}"#)
                .unwrap();
        let patch = patch.validated().unwrap();

        assert_eq!(patch.cep_estabelecimento.as_deref(), Some("60115170"));
        assert_eq!(patch.latitude, Some(None));
        assert_eq!(patch.longitude, None);
    }

    #[test]
    fn patch_rejects_bad_cep() {
        let patch = EnderecoPatch {
            cep_estabelecimento: Some("601".to_string()),
            ..Default::default()
        };
        assert!(patch.validated().is_err());
    }
}
