//! PostgreSQL adapter for EnderecoRepository

use async_trait::async_trait;
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, NotSet,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set,
};

use super::{contains_pattern, map_db_err};
use crate::domain::entities::{
    Endereco, EnderecoFilter, EnderecoId, EnderecoPatch, EstabelecimentoId, NewEndereco, Page,
};
use crate::domain::ports::{EnderecoRepository, Repository};
use crate::domain::validation::normalize_cep;
use crate::entity::enderecos;
use crate::error::DomainError;

/// PostgreSQL implementation of EnderecoRepository
pub struct PostgresEnderecoRepository {
    db: DatabaseConnection,
}

impl PostgresEnderecoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<Endereco> for PostgresEnderecoRepository {
    async fn find_all(
        &self,
        filter: &EnderecoFilter,
        page: Page,
    ) -> Result<Vec<Endereco>, DomainError> {
        // A CEP that cannot be normalized is matched verbatim and finds nothing
        let cep = filter
            .cep
            .as_deref()
            .map(|cep| normalize_cep(cep).unwrap_or_else(|_| cep.to_string()));

        let results = enderecos::Entity::find()
            .apply_if(filter.estabelecimento_id, |q, v| {
                q.filter(enderecos::Column::EstabelecimentoId.eq(v))
            })
            .apply_if(cep, |q, v| q.filter(enderecos::Column::CepEstabelecimento.eq(v)))
            .apply_if(filter.bairro.as_deref(), |q, bairro| {
                q.filter(Expr::col(enderecos::Column::Bairro).ilike(contains_pattern(bairro)))
            })
            .order_by_asc(enderecos::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_id(&self, id: EnderecoId) -> Result<Option<Endereco>, DomainError> {
        let result = enderecos::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, new: &NewEndereco) -> Result<Endereco, DomainError> {
        let model = enderecos::ActiveModel {
            id: NotSet,
            latitude: Set(new.latitude),
            longitude: Set(new.longitude),
            cep_estabelecimento: Set(new.cep_estabelecimento.clone()),
            bairro: Set(new.bairro.clone()),
            logradouro: Set(new.logradouro.clone()),
            numero: Set(new.numero.clone()),
            complemento: Set(new.complemento.clone()),
            estabelecimento_id: Set(new.estabelecimento_id.0),
        };

        let result = model.insert(&self.db).await.map_err(map_db_err)?;

        Ok(result.into())
    }

    async fn update(
        &self,
        id: EnderecoId,
        patch: &EnderecoPatch,
    ) -> Result<Option<Endereco>, DomainError> {
        let Some(existing) = enderecos::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        if let Some(latitude) = patch.latitude {
            active.latitude = Set(latitude);
        }
        if let Some(longitude) = patch.longitude {
            active.longitude = Set(longitude);
        }
        if let Some(cep) = &patch.cep_estabelecimento {
            active.cep_estabelecimento = Set(cep.clone());
        }
        if let Some(bairro) = &patch.bairro {
            active.bairro = Set(bairro.clone());
        }
        if let Some(logradouro) = &patch.logradouro {
            active.logradouro = Set(logradouro.clone());
        }
        if let Some(numero) = &patch.numero {
            active.numero = Set(numero.clone());
        }
        if let Some(complemento) = &patch.complemento {
            active.complemento = Set(complemento.clone());
        }
        if let Some(estabelecimento_id) = patch.estabelecimento_id {
            active.estabelecimento_id = Set(estabelecimento_id.0);
        }

        let result = active.update(&self.db).await.map_err(map_db_err)?;

        Ok(Some(result.into()))
    }

    async fn delete(&self, id: EnderecoId) -> Result<bool, DomainError> {
        let result = enderecos::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl EnderecoRepository for PostgresEnderecoRepository {
    async fn find_by_estabelecimento(
        &self,
        id: EstabelecimentoId,
    ) -> Result<Option<Endereco>, DomainError> {
        let result = enderecos::Entity::find()
            .filter(enderecos::Column::EstabelecimentoId.eq(id.0))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_estabelecimentos(
        &self,
        ids: &[EstabelecimentoId],
    ) -> Result<Vec<Endereco>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = enderecos::Entity::find()
            .filter(enderecos::Column::EstabelecimentoId.is_in(ids.iter().map(|id| id.0)))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<enderecos::Model> for Endereco {
    fn from(model: enderecos::Model) -> Self {
        Endereco {
            id: EnderecoId(model.id),
            latitude: model.latitude,
            longitude: model.longitude,
            cep_estabelecimento: model.cep_estabelecimento,
            bairro: model.bairro,
            logradouro: model.logradouro,
            numero: model.numero,
            complemento: model.complemento,
            estabelecimento_id: EstabelecimentoId(model.estabelecimento_id),
        }
    }
}
