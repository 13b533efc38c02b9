//! Profissional service

use std::sync::Arc;

use super::{deleted, found};
use crate::domain::entities::{
    Equipe, NewProfissional, Page, Profissional, ProfissionalFilter, ProfissionalId,
    ProfissionalPatch,
};
use crate::domain::ports::{EquipeRepository, ProfissionalRepository};
use crate::error::AppError;

/// Service for managing health professionals
pub struct ProfissionalService<PR = dyn ProfissionalRepository, QR = dyn EquipeRepository>
where
    PR: ProfissionalRepository + ?Sized,
    QR: EquipeRepository + ?Sized,
{
    profissionais: Arc<PR>,
    equipes: Arc<QR>,
}

impl<PR, QR> ProfissionalService<PR, QR>
where
    PR: ProfissionalRepository + ?Sized,
    QR: EquipeRepository + ?Sized,
{
    pub fn new(profissionais: Arc<PR>, equipes: Arc<QR>) -> Self {
        Self {
            profissionais,
            equipes,
        }
    }

    pub async fn list(
        &self,
        filter: &ProfissionalFilter,
        page: Page,
    ) -> Result<Vec<Profissional>, AppError> {
        Ok(self.profissionais.find_all(filter, page).await?)
    }

    pub async fn get(&self, id: ProfissionalId) -> Result<Profissional, AppError> {
        found(self.profissionais.find_by_id(id).await?)
    }

    pub async fn get_by_codigo_sus(&self, codigo: &str) -> Result<Profissional, AppError> {
        found(
            self.profissionais
                .find_by_codigo_profissional_sus(codigo)
                .await?,
        )
    }

    pub async fn create(&self, new: NewProfissional) -> Result<Profissional, AppError> {
        let new = new.validated()?;
        Ok(self.profissionais.create(&new).await?)
    }

    pub async fn update(
        &self,
        id: ProfissionalId,
        patch: ProfissionalPatch,
    ) -> Result<Profissional, AppError> {
        let patch = patch.validated()?;
        found(self.profissionais.update(id, &patch).await?)
    }

    /// Delete a professional along with their team memberships
    pub async fn delete(&self, id: ProfissionalId) -> Result<(), AppError> {
        deleted::<Profissional>(self.profissionais.delete(id).await?)
    }

    /// Teams the professional belongs to
    pub async fn equipes(&self, id: ProfissionalId) -> Result<Vec<Equipe>, AppError> {
        self.get(id).await?;
        Ok(self.equipes.find_by_profissional(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use crate::test_utils::{new_profissional, seed_equipe, InMemoryCnesStore};

    fn create_service(
        store: &Arc<InMemoryCnesStore>,
    ) -> ProfissionalService<InMemoryCnesStore, InMemoryCnesStore> {
        ProfissionalService::new(store.clone(), store.clone())
    }

    #[tokio::test]
    async fn create_and_find_by_sus_code() {
        let store = Arc::new(InMemoryCnesStore::new());
        let service = create_service(&store);

        let created = service.create(new_profissional("980016281234567")).await.unwrap();
        let found = service.get_by_codigo_sus("980016281234567").await.unwrap();

        assert_eq!(found, created);
        assert!(service.get_by_codigo_sus("000").await.is_err());
    }

    #[tokio::test]
    async fn duplicate_sus_code_is_rejected() {
        let store = Arc::new(InMemoryCnesStore::new());
        let service = create_service(&store);
        service.create(new_profissional("980016281234567")).await.unwrap();

        match service.create(new_profissional("980016281234567")).await {
            Err(AppError::Domain(DomainError::AlreadyExists(msg))) => {
                assert_eq!(msg, "Código do profissional SUS já cadastrado")
            }
            other => panic!("expected AlreadyExists, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn equipes_lists_memberships() {
        let store = Arc::new(InMemoryCnesStore::new());
        let service = create_service(&store);
        let profissional = service.create(new_profissional("980016281234567")).await.unwrap();
        let equipe = seed_equipe(&store, "0001234567");
        seed_equipe(&store, "0001234568");
        store.link(equipe.id, profissional.id);

        let equipes = service.equipes(profissional.id).await.unwrap();

        assert_eq!(equipes, vec![equipe]);
    }

    #[tokio::test]
    async fn equipes_of_missing_profissional_is_not_found() {
        let store = Arc::new(InMemoryCnesStore::new());
        let service = create_service(&store);

        assert!(matches!(
            service.equipes(ProfissionalId(3)).await,
            Err(AppError::Domain(DomainError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn delete_removes_memberships() {
        let store = Arc::new(InMemoryCnesStore::new());
        let service = create_service(&store);
        let profissional = service.create(new_profissional("980016281234567")).await.unwrap();
        let equipe = seed_equipe(&store, "0001234567");
        store.link(equipe.id, profissional.id);

        service.delete(profissional.id).await.unwrap();

        assert_eq!(store.equipe_prof_count(), 0);
    }
}
