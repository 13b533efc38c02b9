//! PostgreSQL adapter for MantenedoraRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, NotSet,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set,
};

use super::{contains_pattern, map_db_err};
use crate::domain::entities::{
    Mantenedora, MantenedoraFilter, MantenedoraId, MantenedoraPatch, NewMantenedora, Page,
};
use crate::domain::ports::{MantenedoraRepository, Repository};
use crate::entity::mantenedoras;
use crate::error::DomainError;

/// PostgreSQL implementation of MantenedoraRepository
pub struct PostgresMantenedoraRepository {
    db: DatabaseConnection,
}

impl PostgresMantenedoraRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<Mantenedora> for PostgresMantenedoraRepository {
    async fn find_all(
        &self,
        filter: &MantenedoraFilter,
        page: Page,
    ) -> Result<Vec<Mantenedora>, DomainError> {
        let results = mantenedoras::Entity::find()
            .apply_if(filter.cnpj.clone(), |q, cnpj| {
                q.filter(mantenedoras::Column::CnpjMantenedora.eq(cnpj))
            })
            .apply_if(filter.nome.as_deref(), |q, nome| {
                q.filter(
                    Expr::col(mantenedoras::Column::NomeRazaoSocialMantenedora)
                        .ilike(contains_pattern(nome)),
                )
            })
            .order_by_asc(mantenedoras::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_id(&self, id: MantenedoraId) -> Result<Option<Mantenedora>, DomainError> {
        let result = mantenedoras::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, new: &NewMantenedora) -> Result<Mantenedora, DomainError> {
        let created_at = new.data_criacao_mantenedora.unwrap_or_else(Utc::now);

        let model = mantenedoras::ActiveModel {
            id: NotSet,
            cnpj_mantenedora: Set(new.cnpj_mantenedora.clone()),
            nome_razao_social_mantenedora: Set(new.nome_razao_social_mantenedora.clone()),
            numero_telefone_mantenedora: Set(new.numero_telefone_mantenedora.clone()),
            codigo_banco: Set(new.codigo_banco.clone()),
            numero_agencia: Set(new.numero_agencia.clone()),
            numero_conta_corrente: Set(new.numero_conta_corrente.clone()),
            data_criacao_mantenedora: Set(created_at.fixed_offset()),
        };

        let result = model.insert(&self.db).await.map_err(map_db_err)?;

        Ok(result.into())
    }

    async fn update(
        &self,
        id: MantenedoraId,
        patch: &MantenedoraPatch,
    ) -> Result<Option<Mantenedora>, DomainError> {
        let Some(existing) = mantenedoras::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        if let Some(cnpj) = &patch.cnpj_mantenedora {
            active.cnpj_mantenedora = Set(cnpj.clone());
        }
        if let Some(nome) = &patch.nome_razao_social_mantenedora {
            active.nome_razao_social_mantenedora = Set(nome.clone());
        }
        if let Some(telefone) = &patch.numero_telefone_mantenedora {
            active.numero_telefone_mantenedora = Set(telefone.clone());
        }
        if let Some(banco) = &patch.codigo_banco {
            active.codigo_banco = Set(banco.clone());
        }
        if let Some(agencia) = &patch.numero_agencia {
            active.numero_agencia = Set(agencia.clone());
        }
        if let Some(conta) = &patch.numero_conta_corrente {
            active.numero_conta_corrente = Set(conta.clone());
        }

        let result = active.update(&self.db).await.map_err(map_db_err)?;

        Ok(Some(result.into()))
    }

    async fn delete(&self, id: MantenedoraId) -> Result<bool, DomainError> {
        let result = mantenedoras::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl MantenedoraRepository for PostgresMantenedoraRepository {
    async fn find_by_cnpj(&self, cnpj: &str) -> Result<Option<Mantenedora>, DomainError> {
        let result = mantenedoras::Entity::find()
            .filter(mantenedoras::Column::CnpjMantenedora.eq(cnpj))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(|m| m.into()))
    }
}

/// Convert SeaORM model to domain entity
impl From<mantenedoras::Model> for Mantenedora {
    fn from(model: mantenedoras::Model) -> Self {
        Mantenedora {
            id: MantenedoraId(model.id),
            cnpj_mantenedora: model.cnpj_mantenedora,
            nome_razao_social_mantenedora: model.nome_razao_social_mantenedora,
            numero_telefone_mantenedora: model.numero_telefone_mantenedora,
            codigo_banco: model.codigo_banco,
            numero_agencia: model.numero_agencia,
            numero_conta_corrente: model.numero_conta_corrente,
            data_criacao_mantenedora: model.data_criacao_mantenedora.with_timezone(&Utc),
        }
    }
}
