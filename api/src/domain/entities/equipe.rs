//! Equipe domain entity
//!
//! Health teams belong to a facility. Requests name the facility by its
//! `codigo_unidade`; the service resolves it to an id before the row is
//! written, so the request payloads (`CreateEquipe`, `UpdateEquipe`) differ
//! from what the repository takes (`NewEquipe`, `EquipePatch`).

use serde::{Deserialize, Serialize};

use super::estabelecimento::EstabelecimentoId;
use super::profissional::Profissional;
use super::Record;
use crate::domain::validation::Validator;
use crate::error::DomainError;

record_id!(
    /// Unique identifier for an equipe
    EquipeId
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Equipe {
    pub id: EquipeId,
    pub codigo_equipe: String,
    pub nome_equipe: String,
    pub tipo_equipe: String,
    pub estabelecimento_id: EstabelecimentoId,
}

impl Record for Equipe {
    type Id = EquipeId;
    type New = NewEquipe;
    type Patch = EquipePatch;
    type Filter = EquipeFilter;

    const NOT_FOUND: &'static str = "Equipe não encontrada";

    fn id(&self) -> EquipeId {
        self.id
    }
}

/// Team with its roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquipeComProfissionais {
    #[serde(flatten)]
    pub equipe: Equipe,
    pub profissionais: Vec<Profissional>,
}

/// Create request, keyed by the facility's `codigo_unidade`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEquipe {
    pub codigo_equipe: String,
    pub nome_equipe: String,
    pub tipo_equipe: String,
    pub codigo_unidade: String,
}

impl CreateEquipe {
    pub fn validated(self) -> Result<Self, DomainError> {
        let mut v = Validator::new();
        v.length("codigo_equipe", &self.codigo_equipe, 1, 20);
        v.length("nome_equipe", &self.nome_equipe, 1, 255);
        v.length("tipo_equipe", &self.tipo_equipe, 1, 10);
        v.length("codigo_unidade", &self.codigo_unidade, 1, 20);
        v.finish()?;
        Ok(self)
    }

    pub fn resolve(self, estabelecimento_id: EstabelecimentoId) -> NewEquipe {
        NewEquipe {
            codigo_equipe: self.codigo_equipe,
            nome_equipe: self.nome_equipe,
            tipo_equipe: self.tipo_equipe,
            estabelecimento_id,
        }
    }
}

/// Update request; `codigo_unidade` moves the team to another facility
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEquipe {
    pub codigo_equipe: Option<String>,
    pub nome_equipe: Option<String>,
    pub tipo_equipe: Option<String>,
    pub codigo_unidade: Option<String>,
}

impl UpdateEquipe {
    pub fn validated(self) -> Result<Self, DomainError> {
        let mut v = Validator::new();
        if let Some(codigo) = &self.codigo_equipe {
            v.length("codigo_equipe", codigo, 1, 20);
        }
        if let Some(nome) = &self.nome_equipe {
            v.length("nome_equipe", nome, 1, 255);
        }
        if let Some(tipo) = &self.tipo_equipe {
            v.length("tipo_equipe", tipo, 1, 10);
        }
        if let Some(codigo) = &self.codigo_unidade {
            v.length("codigo_unidade", codigo, 1, 20);
        }
        v.finish()?;
        Ok(self)
    }

    pub fn resolve(self, estabelecimento_id: Option<EstabelecimentoId>) -> EquipePatch {
        EquipePatch {
            codigo_equipe: self.codigo_equipe,
            nome_equipe: self.nome_equipe,
            tipo_equipe: self.tipo_equipe,
            estabelecimento_id,
        }
    }
}

/// Row to insert, with the facility already resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEquipe {
    pub codigo_equipe: String,
    pub nome_equipe: String,
    pub tipo_equipe: String,
    pub estabelecimento_id: EstabelecimentoId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipePatch {
    pub codigo_equipe: Option<String>,
    pub nome_equipe: Option<String>,
    pub tipo_equipe: Option<String>,
    pub estabelecimento_id: Option<EstabelecimentoId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EquipeFilter {
    pub codigo_equipe: Option<String>,
    pub tipo_equipe: Option<String>,
    pub estabelecimento_id: Option<i32>,
    /// Case-insensitive substring of the team name
    pub nome: Option<String>,
}

impl EquipeFilter {
    pub fn by_estabelecimento(id: EstabelecimentoId) -> Self {
        Self {
            estabelecimento_id: Some(id.0),
            ..Default::default()
        }
    }
}
