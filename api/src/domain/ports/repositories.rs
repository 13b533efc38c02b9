//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;

use crate::domain::entities::{
    Endereco, Equipe, EquipeId, Estabelecimento, EstabelecimentoId, Mantenedora, MantenedoraId,
    Page, Profissional, ProfissionalId, Record,
};
use crate::error::DomainError;

/// CRUD operations shared by every registry table
///
/// Unique and foreign-key violations surface as `DomainError::AlreadyExists`
/// and `DomainError::InvalidReference`.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// Rows matching `filter`, ordered by id
    async fn find_all(&self, filter: &T::Filter, page: Page) -> Result<Vec<T>, DomainError>;

    async fn find_by_id(&self, id: T::Id) -> Result<Option<T>, DomainError>;

    async fn create(&self, new: &T::New) -> Result<T, DomainError>;

    /// Write the fields present in `patch`; `None` when the row does not exist
    async fn update(&self, id: T::Id, patch: &T::Patch) -> Result<Option<T>, DomainError>;

    /// `false` when the row does not exist
    async fn delete(&self, id: T::Id) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait MantenedoraRepository: Repository<Mantenedora> {
    async fn find_by_cnpj(&self, cnpj: &str) -> Result<Option<Mantenedora>, DomainError>;
}

#[async_trait]
pub trait EstabelecimentoRepository: Repository<Estabelecimento> {
    async fn find_by_codigo_unidade(
        &self,
        codigo: &str,
    ) -> Result<Option<Estabelecimento>, DomainError>;

    async fn find_by_codigo_cnes(&self, codigo: &str)
        -> Result<Option<Estabelecimento>, DomainError>;

    /// Copy a sponsor's CNPJ onto every facility it sponsors; returns the
    /// number of facilities written
    async fn sync_cnpj_mantenedora(
        &self,
        mantenedora: MantenedoraId,
        cnpj: &str,
    ) -> Result<u64, DomainError>;
}

#[async_trait]
pub trait EnderecoRepository: Repository<Endereco> {
    async fn find_by_estabelecimento(
        &self,
        id: EstabelecimentoId,
    ) -> Result<Option<Endereco>, DomainError>;

    /// Addresses of several facilities in one query
    async fn find_by_estabelecimentos(
        &self,
        ids: &[EstabelecimentoId],
    ) -> Result<Vec<Endereco>, DomainError>;
}

#[async_trait]
pub trait ProfissionalRepository: Repository<Profissional> {
    async fn find_by_codigo_profissional_sus(
        &self,
        codigo: &str,
    ) -> Result<Option<Profissional>, DomainError>;

    /// Roster of a team, ordered by id
    async fn find_by_equipe(&self, id: EquipeId) -> Result<Vec<Profissional>, DomainError>;
}

#[async_trait]
pub trait EquipeRepository: Repository<Equipe> {
    async fn find_by_codigo_equipe(&self, codigo: &str) -> Result<Option<Equipe>, DomainError>;

    /// Teams a professional belongs to, ordered by id
    async fn find_by_profissional(&self, id: ProfissionalId) -> Result<Vec<Equipe>, DomainError>;
}
