//! EquipeProf domain entity: membership of a profissional in an equipe

use serde::{Deserialize, Serialize};

use super::equipe::EquipeId;
use super::profissional::ProfissionalId;
use super::Record;
use crate::domain::validation::Validator;
use crate::error::DomainError;

record_id!(
    /// Unique identifier for a team membership
    EquipeProfId
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquipeProf {
    pub id: EquipeProfId,
    pub equipe_id: EquipeId,
    pub profissional_id: ProfissionalId,
}

impl Record for EquipeProf {
    type Id = EquipeProfId;
    type New = NewEquipeProf;
    type Patch = EquipeProfPatch;
    type Filter = EquipeProfFilter;

    const NOT_FOUND: &'static str = "Vínculo de profissional não encontrado";

    fn id(&self) -> EquipeProfId {
        self.id
    }
}

/// Create request, keyed by natural codes
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEquipeProf {
    pub codigo_equipe: String,
    pub codigo_profissional_sus: String,
}

impl CreateEquipeProf {
    pub fn validated(self) -> Result<Self, DomainError> {
        let mut v = Validator::new();
        v.length("codigo_equipe", &self.codigo_equipe, 1, 20);
        v.length("codigo_profissional_sus", &self.codigo_profissional_sus, 1, 20);
        v.finish()?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEquipeProf {
    pub codigo_equipe: Option<String>,
    pub codigo_profissional_sus: Option<String>,
}

impl UpdateEquipeProf {
    pub fn validated(self) -> Result<Self, DomainError> {
        let mut v = Validator::new();
        if let Some(codigo) = &self.codigo_equipe {
            v.length("codigo_equipe", codigo, 1, 20);
        }
        if let Some(codigo) = &self.codigo_profissional_sus {
            v.length("codigo_profissional_sus", codigo, 1, 20);
        }
        v.finish()?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewEquipeProf {
    pub equipe_id: EquipeId,
    pub profissional_id: ProfissionalId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EquipeProfPatch {
    pub equipe_id: Option<EquipeId>,
    pub profissional_id: Option<ProfissionalId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EquipeProfFilter {
    pub equipe_id: Option<i32>,
    pub profissional_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_both_codes() {
        let create = CreateEquipeProf {
            codigo_equipe: String::new(),
            codigo_profissional_sus: "980016281234567".to_string(),
        };
        match create.validated() {
            Err(DomainError::Validation(errors)) => {
                assert!(errors.has("codigo_equipe"));
                assert!(!errors.has("codigo_profissional_sus"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(UpdateEquipeProf::default().validated().is_ok());
    }

    #[test]
    fn serializes_ids_as_numbers() {
        let json = serde_json::to_value(EquipeProf {
            id: EquipeProfId(1),
            equipe_id: EquipeId(2),
            profissional_id: ProfissionalId(3),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "equipe_id": 2, "profissional_id": 3}));
    }
}
