//! Estabelecimento domain entity
//!
//! A registered health facility, identified by its unit code and CNES code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::endereco::Endereco;
use super::mantenedora::MantenedoraId;
use super::{nullable, Record};
use crate::domain::validation::{normalize_telefone, validate_cnpj, validate_email, Validator};
use crate::error::DomainError;

record_id!(
    /// Unique identifier for an estabelecimento
    EstabelecimentoId
);

/// A health facility
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Estabelecimento {
    pub id: EstabelecimentoId,
    pub codigo_unidade: String,
    pub codigo_cnes: String,
    pub cnpj_mantenedora: String,
    pub nome_razao_social_estabelecimento: String,
    pub nome_fantasia_estabelecimento: String,
    pub numero_telefone_estabelecimento: Option<String>,
    pub email_estabelecimento: Option<String>,
    pub mantenedora_id: MantenedoraId,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Estabelecimento {
    type Id = EstabelecimentoId;
    type New = NewEstabelecimento;
    type Patch = EstabelecimentoPatch;
    type Filter = EstabelecimentoFilter;

    const NOT_FOUND: &'static str = "Estabelecimento não encontrado";

    fn id(&self) -> EstabelecimentoId {
        self.id
    }
}

/// Facility with its address embedded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstabelecimentoDetalhado {
    #[serde(flatten)]
    pub estabelecimento: Estabelecimento,
    pub endereco: Option<Endereco>,
}

/// Data needed to create a new estabelecimento
#[derive(Debug, Clone, Deserialize)]
pub struct NewEstabelecimento {
    pub codigo_unidade: String,
    pub codigo_cnes: String,
    pub cnpj_mantenedora: String,
    pub nome_razao_social_estabelecimento: String,
    pub nome_fantasia_estabelecimento: String,
    #[serde(default)]
    pub numero_telefone_estabelecimento: Option<String>,
    #[serde(default)]
    pub email_estabelecimento: Option<String>,
    pub mantenedora_id: MantenedoraId,
}

impl NewEstabelecimento {
    /// Validate and normalize the phone number
    pub fn validated(mut self) -> Result<Self, DomainError> {
        let mut v = Validator::new();
        v.length("codigo_unidade", &self.codigo_unidade, 1, 20);
        v.length("codigo_cnes", &self.codigo_cnes, 7, 7);
        v.check("cnpj_mantenedora", validate_cnpj(&self.cnpj_mantenedora));
        v.length(
            "nome_razao_social_estabelecimento",
            &self.nome_razao_social_estabelecimento,
            3,
            255,
        );
        v.length(
            "nome_fantasia_estabelecimento",
            &self.nome_fantasia_estabelecimento,
            3,
            255,
        );
        if let Some(telefone) = &self.numero_telefone_estabelecimento {
            self.numero_telefone_estabelecimento =
                v.check("numero_telefone_estabelecimento", normalize_telefone(telefone));
        }
        if let Some(email) = &self.email_estabelecimento {
            v.max_length("email_estabelecimento", Some(email), 255);
            v.check("email_estabelecimento", validate_email(email));
        }
        v.finish()?;
        Ok(self)
    }
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstabelecimentoPatch {
    pub codigo_unidade: Option<String>,
    pub codigo_cnes: Option<String>,
    pub cnpj_mantenedora: Option<String>,
    pub nome_razao_social_estabelecimento: Option<String>,
    pub nome_fantasia_estabelecimento: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub numero_telefone_estabelecimento: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub email_estabelecimento: Option<Option<String>>,
    pub mantenedora_id: Option<MantenedoraId>,
}

impl EstabelecimentoPatch {
    pub fn validated(mut self) -> Result<Self, DomainError> {
        let mut v = Validator::new();
        if let Some(codigo) = &self.codigo_unidade {
            v.length("codigo_unidade", codigo, 1, 20);
        }
        if let Some(cnes) = &self.codigo_cnes {
            v.length("codigo_cnes", cnes, 7, 7);
        }
        if let Some(cnpj) = &self.cnpj_mantenedora {
            v.check("cnpj_mantenedora", validate_cnpj(cnpj));
        }
        if let Some(razao) = &self.nome_razao_social_estabelecimento {
            v.length("nome_razao_social_estabelecimento", razao, 3, 255);
        }
        if let Some(fantasia) = &self.nome_fantasia_estabelecimento {
            v.length("nome_fantasia_estabelecimento", fantasia, 3, 255);
        }
        if let Some(Some(telefone)) = &self.numero_telefone_estabelecimento {
            let normalized =
                v.check("numero_telefone_estabelecimento", normalize_telefone(telefone));
            self.numero_telefone_estabelecimento = Some(normalized);
        }
        if let Some(Some(email)) = &self.email_estabelecimento {
            v.max_length("email_estabelecimento", Some(email), 255);
            v.check("email_estabelecimento", validate_email(email));
        }
        v.finish()?;
        Ok(self)
    }

    /// Whether the patch touches the sponsor link
    pub fn changes_mantenedora(&self) -> bool {
        self.cnpj_mantenedora.is_some() || self.mantenedora_id.is_some()
    }
}

/// Listing filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstabelecimentoFilter {
    pub codigo_unidade: Option<String>,
    pub codigo_cnes: Option<String>,
    pub cnpj_mantenedora: Option<String>,
    pub mantenedora_id: Option<i32>,
    /// Case-insensitive substring of the trade or legal name
    pub nome: Option<String>,
}

impl EstabelecimentoFilter {
    pub fn by_mantenedora(id: MantenedoraId) -> Self {
        Self {
            mantenedora_id: Some(id.0),
            ..Default::default()
        }
    }
}
