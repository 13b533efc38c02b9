//! Domain entities
//!
//! Pure domain models for the CNES registry tables.
//! These are separate from the SeaORM entities in the `entity` module.

/// Declares a transparent integer id newtype; in textual scope for the
/// submodules below
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub mod endereco;
pub mod equipe;
pub mod equipe_prof;
pub mod estabelecimento;
pub mod mantenedora;
pub mod profissional;

use serde::{Deserialize, Deserializer};

pub use endereco::{Endereco, EnderecoFilter, EnderecoId, EnderecoPatch, NewEndereco};
pub use equipe::{
    CreateEquipe, Equipe, EquipeComProfissionais, EquipeFilter, EquipeId, EquipePatch, NewEquipe,
    UpdateEquipe,
};
pub use equipe_prof::{
    CreateEquipeProf, EquipeProf, EquipeProfFilter, EquipeProfId, EquipeProfPatch, NewEquipeProf,
    UpdateEquipeProf,
};
pub use estabelecimento::{
    Estabelecimento, EstabelecimentoDetalhado, EstabelecimentoFilter, EstabelecimentoId,
    EstabelecimentoPatch, NewEstabelecimento,
};
pub use mantenedora::{Mantenedora, MantenedoraFilter, MantenedoraId, MantenedoraPatch, NewMantenedora};
pub use profissional::{NewProfissional, Profissional, ProfissionalFilter, ProfissionalId, ProfissionalPatch};

/// A row of one registry table, with the payload types its repository takes
pub trait Record: Clone + Send + Sync + 'static {
    type Id: Copy + Eq + std::fmt::Display + Send + Sync;
    /// Insert payload
    type New: Send + Sync;
    /// Partial update payload
    type Patch: Send + Sync;
    /// Listing filter
    type Filter: Default + Send + Sync;

    /// Message used when a lookup by id misses
    const NOT_FOUND: &'static str;

    fn id(&self) -> Self::Id;
}

/// Limit/offset window for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    pub const DEFAULT_LIMIT: u64 = 100;
    pub const MAX_LIMIT: u64 = 1000;

    /// Clamp caller-supplied values into a valid window
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = limit
            .map(|l| l.clamp(1, Self::MAX_LIMIT as i64) as u64)
            .unwrap_or(Self::DEFAULT_LIMIT);
        let offset = offset.map(|o| o.max(0) as u64).unwrap_or(0);
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in partial updates. Use with `#[serde(default)]`.
pub(crate) fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
