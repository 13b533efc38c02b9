//! Application layer
//!
//! Services validate payloads, resolve natural keys and enforce the
//! cross-table rules the schema cannot express, then delegate to the
//! repository ports.

pub mod endereco_service;
pub mod equipe_prof_service;
pub mod equipe_service;
pub mod estabelecimento_service;
pub mod mantenedora_service;
pub mod profissional_service;

pub use endereco_service::EnderecoService;
pub use equipe_prof_service::EquipeProfService;
pub use equipe_service::EquipeService;
pub use estabelecimento_service::EstabelecimentoService;
pub use mantenedora_service::MantenedoraService;
pub use profissional_service::ProfissionalService;

use crate::domain::entities::Record;
use crate::error::{AppError, DomainError};

/// Turn a missed lookup into a 404 carrying the entity's message
pub(crate) fn found<T: Record>(row: Option<T>) -> Result<T, AppError> {
    row.ok_or_else(|| DomainError::NotFound(T::NOT_FOUND.to_string()).into())
}

/// 404 for a delete that matched nothing
pub(crate) fn deleted<T: Record>(removed: bool) -> Result<(), AppError> {
    if removed {
        Ok(())
    } else {
        Err(DomainError::NotFound(T::NOT_FOUND.to_string()).into())
    }
}
