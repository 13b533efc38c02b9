//! PostgreSQL adapter for EquipeRepository

use async_trait::async_trait;
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, JoinType,
    NotSet, QueryFilter, QueryOrder, QuerySelect, QueryTrait, RelationTrait, Set,
};

use super::{contains_pattern, map_db_err};
use crate::domain::entities::{
    Equipe, EquipeFilter, EquipeId, EquipePatch, EstabelecimentoId, NewEquipe, Page,
    ProfissionalId,
};
use crate::domain::ports::{EquipeRepository, Repository};
use crate::entity::{equipeprofs, equipes};
use crate::error::DomainError;

/// PostgreSQL implementation of EquipeRepository
pub struct PostgresEquipeRepository {
    db: DatabaseConnection,
}

impl PostgresEquipeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<Equipe> for PostgresEquipeRepository {
    async fn find_all(&self, filter: &EquipeFilter, page: Page) -> Result<Vec<Equipe>, DomainError> {
        let results = equipes::Entity::find()
            .apply_if(filter.codigo_equipe.clone(), |q, v| {
                q.filter(equipes::Column::CodigoEquipe.eq(v))
            })
            .apply_if(filter.tipo_equipe.clone(), |q, v| {
                q.filter(equipes::Column::TipoEquipe.eq(v))
            })
            .apply_if(filter.estabelecimento_id, |q, v| {
                q.filter(equipes::Column::EstabelecimentoId.eq(v))
            })
            .apply_if(filter.nome.as_deref(), |q, nome| {
                q.filter(Expr::col(equipes::Column::NomeEquipe).ilike(contains_pattern(nome)))
            })
            .order_by_asc(equipes::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_id(&self, id: EquipeId) -> Result<Option<Equipe>, DomainError> {
        let result = equipes::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, new: &NewEquipe) -> Result<Equipe, DomainError> {
        let model = equipes::ActiveModel {
            id: NotSet,
            codigo_equipe: Set(new.codigo_equipe.clone()),
            nome_equipe: Set(new.nome_equipe.clone()),
            tipo_equipe: Set(new.tipo_equipe.clone()),
            estabelecimento_id: Set(new.estabelecimento_id.0),
        };

        let result = model.insert(&self.db).await.map_err(map_db_err)?;

        Ok(result.into())
    }

    async fn update(&self, id: EquipeId, patch: &EquipePatch) -> Result<Option<Equipe>, DomainError> {
        let Some(existing) = equipes::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        if let Some(codigo) = &patch.codigo_equipe {
            active.codigo_equipe = Set(codigo.clone());
        }
        if let Some(nome) = &patch.nome_equipe {
            active.nome_equipe = Set(nome.clone());
        }
        if let Some(tipo) = &patch.tipo_equipe {
            active.tipo_equipe = Set(tipo.clone());
        }
        if let Some(estabelecimento_id) = patch.estabelecimento_id {
            active.estabelecimento_id = Set(estabelecimento_id.0);
        }

        let result = active.update(&self.db).await.map_err(map_db_err)?;

        Ok(Some(result.into()))
    }

    async fn delete(&self, id: EquipeId) -> Result<bool, DomainError> {
        let result = equipes::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl EquipeRepository for PostgresEquipeRepository {
    async fn find_by_codigo_equipe(&self, codigo: &str) -> Result<Option<Equipe>, DomainError> {
        let result = equipes::Entity::find()
            .filter(equipes::Column::CodigoEquipe.eq(codigo))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_profissional(&self, id: ProfissionalId) -> Result<Vec<Equipe>, DomainError> {
        let results = equipes::Entity::find()
            .join(JoinType::InnerJoin, equipes::Relation::Equipeprofs.def())
            .filter(equipeprofs::Column::ProfissionalId.eq(id.0))
            .order_by_asc(equipes::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<equipes::Model> for Equipe {
    fn from(model: equipes::Model) -> Self {
        Equipe {
            id: EquipeId(model.id),
            codigo_equipe: model.codigo_equipe,
            nome_equipe: model.nome_equipe,
            tipo_equipe: model.tipo_equipe,
            estabelecimento_id: EstabelecimentoId(model.estabelecimento_id),
        }
    }
}
