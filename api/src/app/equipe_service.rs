//! Equipe service
//!
//! Resolves the facility's `codigo_unidade` to its id before writing.

use std::sync::Arc;

use super::{deleted, found};
use crate::domain::entities::{
    CreateEquipe, Equipe, EquipeComProfissionais, EquipeFilter, EquipeId, EstabelecimentoId,
    Page, UpdateEquipe,
};
use crate::domain::ports::{EquipeRepository, EstabelecimentoRepository, ProfissionalRepository};
use crate::error::{AppError, DomainError};

/// Service for managing health teams
pub struct EquipeService<
    QR = dyn EquipeRepository,
    ER = dyn EstabelecimentoRepository,
    PR = dyn ProfissionalRepository,
> where
    QR: EquipeRepository + ?Sized,
    ER: EstabelecimentoRepository + ?Sized,
    PR: ProfissionalRepository + ?Sized,
{
    equipes: Arc<QR>,
    estabelecimentos: Arc<ER>,
    profissionais: Arc<PR>,
}

impl<QR, ER, PR> EquipeService<QR, ER, PR>
where
    QR: EquipeRepository + ?Sized,
    ER: EstabelecimentoRepository + ?Sized,
    PR: ProfissionalRepository + ?Sized,
{
    pub fn new(equipes: Arc<QR>, estabelecimentos: Arc<ER>, profissionais: Arc<PR>) -> Self {
        Self {
            equipes,
            estabelecimentos,
            profissionais,
        }
    }

    pub async fn list(&self, filter: &EquipeFilter, page: Page) -> Result<Vec<Equipe>, AppError> {
        Ok(self.equipes.find_all(filter, page).await?)
    }

    pub async fn get(&self, id: EquipeId) -> Result<Equipe, AppError> {
        found(self.equipes.find_by_id(id).await?)
    }

    /// Team with its roster
    pub async fn get_with_profissionais(
        &self,
        id: EquipeId,
    ) -> Result<EquipeComProfissionais, AppError> {
        let equipe = self.get(id).await?;
        let profissionais = self.profissionais.find_by_equipe(id).await?;
        Ok(EquipeComProfissionais {
            equipe,
            profissionais,
        })
    }

    pub async fn find_by_codigo(&self, codigo: &str) -> Result<Option<Equipe>, AppError> {
        Ok(self.equipes.find_by_codigo_equipe(codigo).await?)
    }

    pub async fn create(&self, payload: CreateEquipe) -> Result<Equipe, AppError> {
        let payload = payload.validated()?;
        let estabelecimento_id = self.resolve_unidade(&payload.codigo_unidade).await?;
        let new = payload.resolve(estabelecimento_id);
        Ok(self.equipes.create(&new).await?)
    }

    pub async fn update(&self, id: EquipeId, payload: UpdateEquipe) -> Result<Equipe, AppError> {
        let payload = payload.validated()?;
        let estabelecimento_id = match payload.codigo_unidade.as_deref() {
            Some(codigo) => Some(self.resolve_unidade(codigo).await?),
            None => None,
        };
        let patch = payload.resolve(estabelecimento_id);
        found(self.equipes.update(id, &patch).await?)
    }

    pub async fn delete(&self, id: EquipeId) -> Result<(), AppError> {
        deleted::<Equipe>(self.equipes.delete(id).await?)
    }

    async fn resolve_unidade(&self, codigo_unidade: &str) -> Result<EstabelecimentoId, AppError> {
        self.estabelecimentos
            .find_by_codigo_unidade(codigo_unidade)
            .await?
            .map(|e| e.id)
            .ok_or_else(|| {
                DomainError::InvalidReference("Estabelecimento não encontrado".to_string()).into()
            })
    }
}
