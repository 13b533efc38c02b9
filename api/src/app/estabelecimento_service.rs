//! Estabelecimento service
//!
//! Keeps a facility's `cnpj_mantenedora` consistent with the mantenedora it
//! points to and embeds the facility's address in reads.

use std::collections::HashMap;
use std::sync::Arc;

use super::{deleted, found};
use crate::domain::entities::{
    Endereco, Equipe, EquipeFilter, Estabelecimento, EstabelecimentoDetalhado,
    EstabelecimentoFilter, EstabelecimentoId, EstabelecimentoPatch, MantenedoraId,
    NewEstabelecimento, Page,
};
use crate::domain::ports::{
    EnderecoRepository, EquipeRepository, EstabelecimentoRepository, MantenedoraRepository,
};
use crate::domain::validation::ValidationErrors;
use crate::error::{AppError, DomainError};

/// Service for managing estabelecimentos
pub struct EstabelecimentoService<
    ER = dyn EstabelecimentoRepository,
    MR = dyn MantenedoraRepository,
    AR = dyn EnderecoRepository,
    QR = dyn EquipeRepository,
> where
    ER: EstabelecimentoRepository + ?Sized,
    MR: MantenedoraRepository + ?Sized,
    AR: EnderecoRepository + ?Sized,
    QR: EquipeRepository + ?Sized,
{
    estabelecimentos: Arc<ER>,
    mantenedoras: Arc<MR>,
    enderecos: Arc<AR>,
    equipes: Arc<QR>,
}

impl<ER, MR, AR, QR> EstabelecimentoService<ER, MR, AR, QR>
where
    ER: EstabelecimentoRepository + ?Sized,
    MR: MantenedoraRepository + ?Sized,
    AR: EnderecoRepository + ?Sized,
    QR: EquipeRepository + ?Sized,
{
    pub fn new(
        estabelecimentos: Arc<ER>,
        mantenedoras: Arc<MR>,
        enderecos: Arc<AR>,
        equipes: Arc<QR>,
    ) -> Self {
        Self {
            estabelecimentos,
            mantenedoras,
            enderecos,
            equipes,
        }
    }

    /// List facilities with their addresses embedded
    pub async fn list(
        &self,
        filter: &EstabelecimentoFilter,
        page: Page,
    ) -> Result<Vec<EstabelecimentoDetalhado>, AppError> {
        let estabelecimentos = self.estabelecimentos.find_all(filter, page).await?;
        let ids: Vec<EstabelecimentoId> = estabelecimentos.iter().map(|e| e.id).collect();

        let mut enderecos: HashMap<EstabelecimentoId, Endereco> = self
            .enderecos
            .find_by_estabelecimentos(&ids)
            .await?
            .into_iter()
            .map(|e| (e.estabelecimento_id, e))
            .collect();

        Ok(estabelecimentos
            .into_iter()
            .map(|estabelecimento| EstabelecimentoDetalhado {
                endereco: enderecos.remove(&estabelecimento.id),
                estabelecimento,
            })
            .collect())
    }

    pub async fn get(&self, id: EstabelecimentoId) -> Result<EstabelecimentoDetalhado, AppError> {
        let estabelecimento = found(self.estabelecimentos.find_by_id(id).await?)?;
        self.detalhar(estabelecimento).await
    }

    pub async fn get_by_codigo_unidade(
        &self,
        codigo: &str,
    ) -> Result<EstabelecimentoDetalhado, AppError> {
        let estabelecimento = found(self.estabelecimentos.find_by_codigo_unidade(codigo).await?)?;
        self.detalhar(estabelecimento).await
    }

    pub async fn get_by_codigo_cnes(
        &self,
        codigo: &str,
    ) -> Result<EstabelecimentoDetalhado, AppError> {
        let estabelecimento = found(self.estabelecimentos.find_by_codigo_cnes(codigo).await?)?;
        self.detalhar(estabelecimento).await
    }

    pub async fn create(&self, new: NewEstabelecimento) -> Result<Estabelecimento, AppError> {
        let new = new.validated()?;
        self.check_mantenedora(new.mantenedora_id, &new.cnpj_mantenedora)
            .await?;

        let estabelecimento = self.estabelecimentos.create(&new).await?;
        tracing::debug!(
            "Created estabelecimento {} (CNES {})",
            estabelecimento.id,
            estabelecimento.codigo_cnes
        );
        Ok(estabelecimento)
    }

    pub async fn update(
        &self,
        id: EstabelecimentoId,
        patch: EstabelecimentoPatch,
    ) -> Result<Estabelecimento, AppError> {
        let patch = patch.validated()?;

        if patch.changes_mantenedora() {
            let existing = found(self.estabelecimentos.find_by_id(id).await?)?;
            let mantenedora_id = patch.mantenedora_id.unwrap_or(existing.mantenedora_id);
            let cnpj = patch
                .cnpj_mantenedora
                .as_deref()
                .unwrap_or(&existing.cnpj_mantenedora);
            self.check_mantenedora(mantenedora_id, cnpj).await?;
        }

        found(self.estabelecimentos.update(id, &patch).await?)
    }

    pub async fn delete(&self, id: EstabelecimentoId) -> Result<(), AppError> {
        deleted::<Estabelecimento>(self.estabelecimentos.delete(id).await?)
    }

    /// Address of a facility; 404 when either is missing
    pub async fn endereco(&self, id: EstabelecimentoId) -> Result<Endereco, AppError> {
        found(self.estabelecimentos.find_by_id(id).await?)?;
        found(self.enderecos.find_by_estabelecimento(id).await?)
    }

    /// Teams of a facility
    pub async fn equipes(&self, id: EstabelecimentoId, page: Page) -> Result<Vec<Equipe>, AppError> {
        found(self.estabelecimentos.find_by_id(id).await?)?;
        let filter = EquipeFilter::by_estabelecimento(id);
        Ok(self.equipes.find_all(&filter, page).await?)
    }

    async fn detalhar(
        &self,
        estabelecimento: Estabelecimento,
    ) -> Result<EstabelecimentoDetalhado, AppError> {
        let endereco = self
            .enderecos
            .find_by_estabelecimento(estabelecimento.id)
            .await?;
        Ok(EstabelecimentoDetalhado {
            estabelecimento,
            endereco,
        })
    }

    /// The mantenedora must exist and carry the CNPJ the facility declares
    async fn check_mantenedora(&self, id: MantenedoraId, cnpj: &str) -> Result<(), AppError> {
        let mantenedora = self.mantenedoras.find_by_id(id).await?.ok_or_else(|| {
            DomainError::NotFound(format!("Mantenedora com ID {} não encontrada", id))
        })?;

        if mantenedora.cnpj_mantenedora != cnpj {
            return Err(DomainError::Validation(ValidationErrors::single(
                "cnpj_mantenedora",
                format!(
                    "CNPJ {} não corresponde ao da mantenedora {}",
                    cnpj, mantenedora.id
                ),
            ))
            .into());
        }
        Ok(())
    }
}
