//! PostgreSQL adapter for team memberships

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, NotSet,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set,
};

use super::map_db_err;
use crate::domain::entities::{
    EquipeId, EquipeProf, EquipeProfFilter, EquipeProfId, EquipeProfPatch, NewEquipeProf, Page,
    ProfissionalId,
};
use crate::domain::ports::Repository;
use crate::entity::equipeprofs;
use crate::error::DomainError;

pub struct PostgresEquipeProfRepository {
    db: DatabaseConnection,
}

impl PostgresEquipeProfRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<EquipeProf> for PostgresEquipeProfRepository {
    async fn find_all(
        &self,
        filter: &EquipeProfFilter,
        page: Page,
    ) -> Result<Vec<EquipeProf>, DomainError> {
        let results = equipeprofs::Entity::find()
            .apply_if(filter.equipe_id, |q, v| {
                q.filter(equipeprofs::Column::EquipeId.eq(v))
            })
            .apply_if(filter.profissional_id, |q, v| {
                q.filter(equipeprofs::Column::ProfissionalId.eq(v))
            })
            .order_by_asc(equipeprofs::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_id(&self, id: EquipeProfId) -> Result<Option<EquipeProf>, DomainError> {
        let result = equipeprofs::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, new: &NewEquipeProf) -> Result<EquipeProf, DomainError> {
        let model = equipeprofs::ActiveModel {
            id: NotSet,
            equipe_id: Set(new.equipe_id.0),
            profissional_id: Set(new.profissional_id.0),
        };

        let result = model.insert(&self.db).await.map_err(map_db_err)?;

        Ok(result.into())
    }

    async fn update(
        &self,
        id: EquipeProfId,
        patch: &EquipeProfPatch,
    ) -> Result<Option<EquipeProf>, DomainError> {
        let Some(existing) = equipeprofs::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        if let Some(equipe_id) = patch.equipe_id {
            active.equipe_id = Set(equipe_id.0);
        }
        if let Some(profissional_id) = patch.profissional_id {
            active.profissional_id = Set(profissional_id.0);
        }

        let result = active.update(&self.db).await.map_err(map_db_err)?;

        Ok(Some(result.into()))
    }

    async fn delete(&self, id: EquipeProfId) -> Result<bool, DomainError> {
        let result = equipeprofs::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }
}

/// Convert SeaORM model to domain entity
impl From<equipeprofs::Model> for EquipeProf {
    fn from(model: equipeprofs::Model) -> Self {
        EquipeProf {
            id: EquipeProfId(model.id),
            equipe_id: EquipeId(model.equipe_id),
            profissional_id: ProfissionalId(model.profissional_id),
        }
    }
}
