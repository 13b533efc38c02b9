//! Mantenedora service

use std::sync::Arc;

use super::{deleted, found};
use crate::domain::entities::{
    Estabelecimento, EstabelecimentoFilter, Mantenedora, MantenedoraFilter, MantenedoraId,
    MantenedoraPatch, NewMantenedora, Page,
};
use crate::domain::ports::{EstabelecimentoRepository, MantenedoraRepository};
use crate::error::AppError;

/// Service for managing mantenedoras
pub struct MantenedoraService<MR = dyn MantenedoraRepository, ER = dyn EstabelecimentoRepository>
where
    MR: MantenedoraRepository + ?Sized,
    ER: EstabelecimentoRepository + ?Sized,
{
    mantenedoras: Arc<MR>,
    estabelecimentos: Arc<ER>,
}

impl<MR, ER> MantenedoraService<MR, ER>
where
    MR: MantenedoraRepository + ?Sized,
    ER: EstabelecimentoRepository + ?Sized,
{
    pub fn new(mantenedoras: Arc<MR>, estabelecimentos: Arc<ER>) -> Self {
        Self {
            mantenedoras,
            estabelecimentos,
        }
    }

    pub async fn list(
        &self,
        filter: &MantenedoraFilter,
        page: Page,
    ) -> Result<Vec<Mantenedora>, AppError> {
        Ok(self.mantenedoras.find_all(filter, page).await?)
    }

    pub async fn get(&self, id: MantenedoraId) -> Result<Mantenedora, AppError> {
        found(self.mantenedoras.find_by_id(id).await?)
    }

    pub async fn find_by_cnpj(&self, cnpj: &str) -> Result<Option<Mantenedora>, AppError> {
        Ok(self.mantenedoras.find_by_cnpj(cnpj).await?)
    }

    pub async fn create(&self, new: NewMantenedora) -> Result<Mantenedora, AppError> {
        let new = new.validated()?;
        let mantenedora = self.mantenedoras.create(&new).await?;
        tracing::debug!("Created mantenedora {}", mantenedora.id);
        Ok(mantenedora)
    }

    pub async fn update(
        &self,
        id: MantenedoraId,
        patch: MantenedoraPatch,
    ) -> Result<Mantenedora, AppError> {
        let patch = patch.validated()?;
        let mantenedora = found(self.mantenedoras.update(id, &patch).await?)?;

        // Facilities carry a copy of the sponsor's CNPJ
        if patch.cnpj_mantenedora.is_some() {
            let synced = self
                .estabelecimentos
                .sync_cnpj_mantenedora(mantenedora.id, &mantenedora.cnpj_mantenedora)
                .await?;
            tracing::debug!(
                "Mantenedora {} CNPJ copied to {} estabelecimentos",
                mantenedora.id,
                synced
            );
        }
        Ok(mantenedora)
    }

    /// Delete a mantenedora and, through the schema, every facility it sponsors
    pub async fn delete(&self, id: MantenedoraId) -> Result<(), AppError> {
        deleted::<Mantenedora>(self.mantenedoras.delete(id).await?)?;
        tracing::info!("Deleted mantenedora {}", id);
        Ok(())
    }

    /// Facilities sponsored by a mantenedora
    pub async fn list_estabelecimentos(
        &self,
        id: MantenedoraId,
        page: Page,
    ) -> Result<Vec<Estabelecimento>, AppError> {
        self.get(id).await?;
        let filter = EstabelecimentoFilter::by_mantenedora(id);
        Ok(self.estabelecimentos.find_all(&filter, page).await?)
    }
}
