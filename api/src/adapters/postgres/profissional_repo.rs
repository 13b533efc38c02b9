//! PostgreSQL adapter for ProfissionalRepository

use async_trait::async_trait;
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, JoinType,
    NotSet, QueryFilter, QueryOrder, QuerySelect, QueryTrait, RelationTrait, Set,
};

use super::{contains_pattern, map_db_err};
use crate::domain::entities::{
    EquipeId, NewProfissional, Page, Profissional, ProfissionalFilter, ProfissionalId,
    ProfissionalPatch,
};
use crate::domain::ports::{ProfissionalRepository, Repository};
use crate::entity::{equipeprofs, profissionais};
use crate::error::DomainError;

/// PostgreSQL implementation of ProfissionalRepository
pub struct PostgresProfissionalRepository {
    db: DatabaseConnection,
}

impl PostgresProfissionalRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<Profissional> for PostgresProfissionalRepository {
    async fn find_all(
        &self,
        filter: &ProfissionalFilter,
        page: Page,
    ) -> Result<Vec<Profissional>, DomainError> {
        let results = profissionais::Entity::find()
            .apply_if(filter.codigo_profissional_sus.clone(), |q, v| {
                q.filter(profissionais::Column::CodigoProfissionalSus.eq(v))
            })
            .apply_if(filter.codigo_cns.clone(), |q, v| {
                q.filter(profissionais::Column::CodigoCns.eq(v))
            })
            .apply_if(filter.nome.as_deref(), |q, nome| {
                q.filter(
                    Expr::col(profissionais::Column::NomeProfissional)
                        .ilike(contains_pattern(nome)),
                )
            })
            .order_by_asc(profissionais::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_id(&self, id: ProfissionalId) -> Result<Option<Profissional>, DomainError> {
        let result = profissionais::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, new: &NewProfissional) -> Result<Profissional, DomainError> {
        let model = profissionais::ActiveModel {
            id: NotSet,
            codigo_profissional_sus: Set(new.codigo_profissional_sus.clone()),
            nome_profissional: Set(new.nome_profissional.clone()),
            codigo_cns: Set(new.codigo_cns.clone()),
            situacao_profissional_cadsus: Set(new.situacao_profissional_cadsus.clone()),
        };

        let result = model.insert(&self.db).await.map_err(map_db_err)?;

        Ok(result.into())
    }

    async fn update(
        &self,
        id: ProfissionalId,
        patch: &ProfissionalPatch,
    ) -> Result<Option<Profissional>, DomainError> {
        let Some(existing) = profissionais::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        if let Some(codigo) = &patch.codigo_profissional_sus {
            active.codigo_profissional_sus = Set(codigo.clone());
        }
        if let Some(nome) = &patch.nome_profissional {
            active.nome_profissional = Set(nome.clone());
        }
        if let Some(cns) = &patch.codigo_cns {
            active.codigo_cns = Set(cns.clone());
        }
        if let Some(situacao) = &patch.situacao_profissional_cadsus {
            active.situacao_profissional_cadsus = Set(situacao.clone());
        }

        let result = active.update(&self.db).await.map_err(map_db_err)?;

        Ok(Some(result.into()))
    }

    async fn delete(&self, id: ProfissionalId) -> Result<bool, DomainError> {
        let result = profissionais::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl ProfissionalRepository for PostgresProfissionalRepository {
    async fn find_by_codigo_profissional_sus(
        &self,
        codigo: &str,
    ) -> Result<Option<Profissional>, DomainError> {
        let result = profissionais::Entity::find()
            .filter(profissionais::Column::CodigoProfissionalSus.eq(codigo))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_equipe(&self, id: EquipeId) -> Result<Vec<Profissional>, DomainError> {
        let results = profissionais::Entity::find()
            .join(
                JoinType::InnerJoin,
                profissionais::Relation::Equipeprofs.def(),
            )
            .filter(equipeprofs::Column::EquipeId.eq(id.0))
            .order_by_asc(profissionais::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<profissionais::Model> for Profissional {
    fn from(model: profissionais::Model) -> Self {
        Profissional {
            id: ProfissionalId(model.id),
            codigo_profissional_sus: model.codigo_profissional_sus,
            nome_profissional: model.nome_profissional,
            codigo_cns: model.codigo_cns,
            situacao_profissional_cadsus: model.situacao_profissional_cadsus,
        }
    }
}
