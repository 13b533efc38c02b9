//! Endereco service

use std::sync::Arc;

use super::{deleted, found};
use crate::domain::entities::{
    Endereco, EnderecoFilter, EnderecoId, EnderecoPatch, EstabelecimentoId, NewEndereco, Page,
};
use crate::domain::ports::{EnderecoRepository, EstabelecimentoRepository};
use crate::error::{AppError, DomainError};

/// Service for managing facility addresses
pub struct EnderecoService<AR = dyn EnderecoRepository, ER = dyn EstabelecimentoRepository>
where
    AR: EnderecoRepository + ?Sized,
    ER: EstabelecimentoRepository + ?Sized,
{
    enderecos: Arc<AR>,
    estabelecimentos: Arc<ER>,
}

impl<AR, ER> EnderecoService<AR, ER>
where
    AR: EnderecoRepository + ?Sized,
    ER: EstabelecimentoRepository + ?Sized,
{
    pub fn new(enderecos: Arc<AR>, estabelecimentos: Arc<ER>) -> Self {
        Self {
            enderecos,
            estabelecimentos,
        }
    }

    pub async fn list(&self, filter: &EnderecoFilter, page: Page) -> Result<Vec<Endereco>, AppError> {
        Ok(self.enderecos.find_all(filter, page).await?)
    }

    pub async fn get(&self, id: EnderecoId) -> Result<Endereco, AppError> {
        found(self.enderecos.find_by_id(id).await?)
    }

    pub async fn find_by_estabelecimento(
        &self,
        id: EstabelecimentoId,
    ) -> Result<Option<Endereco>, AppError> {
        Ok(self.enderecos.find_by_estabelecimento(id).await?)
    }

    pub async fn create(&self, new: NewEndereco) -> Result<Endereco, AppError> {
        let new = new.validated()?;
        self.check_estabelecimento_livre(new.estabelecimento_id, None)
            .await?;
        Ok(self.enderecos.create(&new).await?)
    }

    /// Moving an address to another facility re-checks that facility
    pub async fn update(&self, id: EnderecoId, patch: EnderecoPatch) -> Result<Endereco, AppError> {
        let patch = patch.validated()?;

        if let Some(estabelecimento_id) = patch.estabelecimento_id {
            let existing = found(self.enderecos.find_by_id(id).await?)?;
            if existing.estabelecimento_id != estabelecimento_id {
                self.check_estabelecimento_livre(estabelecimento_id, Some(id))
                    .await?;
            }
        }

        found(self.enderecos.update(id, &patch).await?)
    }

    pub async fn delete(&self, id: EnderecoId) -> Result<(), AppError> {
        deleted::<Endereco>(self.enderecos.delete(id).await?)
    }

    /// The facility must exist and have no address other than `own`
    async fn check_estabelecimento_livre(
        &self,
        estabelecimento_id: EstabelecimentoId,
        own: Option<EnderecoId>,
    ) -> Result<(), AppError> {
        if self
            .estabelecimentos
            .find_by_id(estabelecimento_id)
            .await?
            .is_none()
        {
            return Err(DomainError::NotFound(format!(
                "Estabelecimento com ID {} não encontrado",
                estabelecimento_id
            ))
            .into());
        }

        if let Some(current) = self
            .enderecos
            .find_by_estabelecimento(estabelecimento_id)
            .await?
        {
            if Some(current.id) != own {
                return Err(AppError::BadRequest(format!(
                    "Já existe um endereço cadastrado para o estabelecimento {}",
                    estabelecimento_id
                )));
            }
        }
        Ok(())
    }
}
