//! Team membership service

use std::sync::Arc;

use super::{deleted, found};
use crate::domain::entities::{
    CreateEquipeProf, EquipeId, EquipeProf, EquipeProfFilter, EquipeProfId, EquipeProfPatch,
    NewEquipeProf, Page, ProfissionalId, UpdateEquipeProf,
};
use crate::domain::ports::{EquipeRepository, ProfissionalRepository, Repository};
use crate::error::{AppError, DomainError};

/// Service for linking professionals to teams
pub struct EquipeProfService<
    LR = dyn Repository<EquipeProf>,
    QR = dyn EquipeRepository,
    PR = dyn ProfissionalRepository,
> where
    LR: Repository<EquipeProf> + ?Sized,
    QR: EquipeRepository + ?Sized,
    PR: ProfissionalRepository + ?Sized,
{
    vinculos: Arc<LR>,
    equipes: Arc<QR>,
    profissionais: Arc<PR>,
}

impl<LR, QR, PR> EquipeProfService<LR, QR, PR>
where
    LR: Repository<EquipeProf> + ?Sized,
    QR: EquipeRepository + ?Sized,
    PR: ProfissionalRepository + ?Sized,
{
    pub fn new(vinculos: Arc<LR>, equipes: Arc<QR>, profissionais: Arc<PR>) -> Self {
        Self {
            vinculos,
            equipes,
            profissionais,
        }
    }

    pub async fn list(
        &self,
        filter: &EquipeProfFilter,
        page: Page,
    ) -> Result<Vec<EquipeProf>, AppError> {
        Ok(self.vinculos.find_all(filter, page).await?)
    }

    pub async fn get(&self, id: EquipeProfId) -> Result<EquipeProf, AppError> {
        found(self.vinculos.find_by_id(id).await?)
    }

    pub async fn create(&self, payload: CreateEquipeProf) -> Result<EquipeProf, AppError> {
        let payload = payload.validated()?;
        let new = NewEquipeProf {
            equipe_id: self.resolve_equipe(&payload.codigo_equipe).await?,
            profissional_id: self
                .resolve_profissional(&payload.codigo_profissional_sus)
                .await?,
        };
        Ok(self.vinculos.create(&new).await?)
    }

    /// Move a membership to another team and/or professional
    pub async fn update(
        &self,
        id: EquipeProfId,
        payload: UpdateEquipeProf,
    ) -> Result<EquipeProf, AppError> {
        let payload = payload.validated()?;
        let mut patch = EquipeProfPatch::default();
        if let Some(codigo) = payload.codigo_equipe.as_deref() {
            patch.equipe_id = Some(self.resolve_equipe(codigo).await?);
        }
        if let Some(codigo) = payload.codigo_profissional_sus.as_deref() {
            patch.profissional_id = Some(self.resolve_profissional(codigo).await?);
        }
        found(self.vinculos.update(id, &patch).await?)
    }

    pub async fn delete(&self, id: EquipeProfId) -> Result<(), AppError> {
        deleted::<EquipeProf>(self.vinculos.delete(id).await?)
    }

    async fn resolve_equipe(&self, codigo: &str) -> Result<EquipeId, AppError> {
        self.equipes
            .find_by_codigo_equipe(codigo)
            .await?
            .map(|e| e.id)
            .ok_or_else(|| DomainError::InvalidReference("Equipe não encontrada".to_string()).into())
    }

    async fn resolve_profissional(&self, codigo: &str) -> Result<ProfissionalId, AppError> {
        self.profissionais
            .find_by_codigo_profissional_sus(codigo)
            .await?
            .map(|p| p.id)
            .ok_or_else(|| {
                DomainError::InvalidReference("Profissional não encontrado".to_string()).into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{new_profissional, seed_equipe, InMemoryCnesStore};

    type Service = EquipeProfService<InMemoryCnesStore, InMemoryCnesStore, InMemoryCnesStore>;

    fn create_service(store: &Arc<InMemoryCnesStore>) -> Service {
        EquipeProfService::new(store.clone(), store.clone(), store.clone())
    }

    fn payload(codigo_equipe: &str, codigo_sus: &str) -> CreateEquipeProf {
        CreateEquipeProf {
            codigo_equipe: codigo_equipe.to_string(),
            codigo_profissional_sus: codigo_sus.to_string(),
        }
    }

    #[tokio::test]
    async fn create_resolves_both_codes() {
        let store = Arc::new(InMemoryCnesStore::new());
        let service = create_service(&store);
        let equipe = seed_equipe(&store, "0001234567");
        let profissional = store.insert_profissional(new_profissional("980016281234567"));

        let vinculo = service
            .create(payload("0001234567", "980016281234567"))
            .await
            .unwrap();

        assert_eq!(vinculo.equipe_id, equipe.id);
        assert_eq!(vinculo.profissional_id, profissional.id);
    }

    #[tokio::test]
    async fn unknown_codes_are_invalid_references() {
        let store = Arc::new(InMemoryCnesStore::new());
        let service = create_service(&store);
        seed_equipe(&store, "0001234567");

        match service.create(payload("0009999999", "980016281234567")).await {
            Err(AppError::Domain(DomainError::InvalidReference(msg))) => {
                assert_eq!(msg, "Equipe não encontrada")
            }
            other => panic!("expected InvalidReference, got {:?}", other),
        }

        match service.create(payload("0001234567", "980016281234567")).await {
            Err(AppError::Domain(DomainError::InvalidReference(msg))) => {
                assert_eq!(msg, "Profissional não encontrado")
            }
            other => panic!("expected InvalidReference, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn duplicate_membership_is_rejected() {
        let store = Arc::new(InMemoryCnesStore::new());
        let service = create_service(&store);
        seed_equipe(&store, "0001234567");
        store.insert_profissional(new_profissional("980016281234567"));
        service
            .create(payload("0001234567", "980016281234567"))
            .await
            .unwrap();

        match service.create(payload("0001234567", "980016281234567")).await {
            Err(AppError::Domain(DomainError::AlreadyExists(msg))) => {
                assert_eq!(msg, "Profissional já vinculado a esta equipe")
            }
            other => panic!("expected AlreadyExists, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn update_moves_membership_to_another_team() {
        let store = Arc::new(InMemoryCnesStore::new());
        let service = create_service(&store);
        seed_equipe(&store, "0001234567");
        let other = seed_equipe(&store, "0001234568");
        store.insert_profissional(new_profissional("980016281234567"));
        let vinculo = service
            .create(payload("0001234567", "980016281234567"))
            .await
            .unwrap();

        let moved = service
            .update(
                vinculo.id,
                UpdateEquipeProf {
                    codigo_equipe: Some("0001234568".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(moved.equipe_id, other.id);
        assert_eq!(moved.profissional_id, vinculo.profissional_id);
    }

    #[tokio::test]
    async fn list_filters_by_equipe() {
        let store = Arc::new(InMemoryCnesStore::new());
        let service = create_service(&store);
        let a = seed_equipe(&store, "0001234567");
        let b = seed_equipe(&store, "0001234568");
        let p = store.insert_profissional(new_profissional("980016281234567"));
        store.link(a.id, p.id);
        store.link(b.id, p.id);

        let filter = EquipeProfFilter {
            equipe_id: Some(b.id.0),
            ..Default::default()
        };
        let listed = service.list(&filter, Page::default()).await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].equipe_id, b.id);
    }
}
