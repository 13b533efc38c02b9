//! PostgreSQL adapter for EstabelecimentoRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    NotSet, QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set,
};

use super::{contains_pattern, map_db_err};
use crate::domain::entities::{
    Estabelecimento, EstabelecimentoFilter, EstabelecimentoId, EstabelecimentoPatch,
    MantenedoraId, NewEstabelecimento, Page,
};
use crate::domain::ports::{EstabelecimentoRepository, Repository};
use crate::entity::estabelecimentos;
use crate::error::DomainError;

/// PostgreSQL implementation of EstabelecimentoRepository
pub struct PostgresEstabelecimentoRepository {
    db: DatabaseConnection,
}

impl PostgresEstabelecimentoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_one_by(
        &self,
        column: estabelecimentos::Column,
        value: &str,
    ) -> Result<Option<Estabelecimento>, DomainError> {
        let result = estabelecimentos::Entity::find()
            .filter(column.eq(value))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(|m| m.into()))
    }
}

#[async_trait]
impl Repository<Estabelecimento> for PostgresEstabelecimentoRepository {
    async fn find_all(
        &self,
        filter: &EstabelecimentoFilter,
        page: Page,
    ) -> Result<Vec<Estabelecimento>, DomainError> {
        use estabelecimentos::Column;

        let results = estabelecimentos::Entity::find()
            .apply_if(filter.codigo_unidade.clone(), |q, v| {
                q.filter(Column::CodigoUnidade.eq(v))
            })
            .apply_if(filter.codigo_cnes.clone(), |q, v| {
                q.filter(Column::CodigoCnes.eq(v))
            })
            .apply_if(filter.cnpj_mantenedora.clone(), |q, v| {
                q.filter(Column::CnpjMantenedora.eq(v))
            })
            .apply_if(filter.mantenedora_id, |q, v| {
                q.filter(Column::MantenedoraId.eq(v))
            })
            .apply_if(filter.nome.as_deref(), |q, nome| {
                let pattern = contains_pattern(nome);
                q.filter(
                    Condition::any()
                        .add(Expr::col(Column::NomeFantasiaEstabelecimento).ilike(pattern.clone()))
                        .add(Expr::col(Column::NomeRazaoSocialEstabelecimento).ilike(pattern)),
                )
            })
            .order_by_asc(Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_id(
        &self,
        id: EstabelecimentoId,
    ) -> Result<Option<Estabelecimento>, DomainError> {
        let result = estabelecimentos::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, new: &NewEstabelecimento) -> Result<Estabelecimento, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = estabelecimentos::ActiveModel {
            id: NotSet,
            codigo_unidade: Set(new.codigo_unidade.clone()),
            codigo_cnes: Set(new.codigo_cnes.clone()),
            cnpj_mantenedora: Set(new.cnpj_mantenedora.clone()),
            nome_razao_social_estabelecimento: Set(new.nome_razao_social_estabelecimento.clone()),
            nome_fantasia_estabelecimento: Set(new.nome_fantasia_estabelecimento.clone()),
            numero_telefone_estabelecimento: Set(new.numero_telefone_estabelecimento.clone()),
            email_estabelecimento: Set(new.email_estabelecimento.clone()),
            mantenedora_id: Set(new.mantenedora_id.0),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let result = model.insert(&self.db).await.map_err(map_db_err)?;

        Ok(result.into())
    }

    async fn update(
        &self,
        id: EstabelecimentoId,
        patch: &EstabelecimentoPatch,
    ) -> Result<Option<Estabelecimento>, DomainError> {
        let Some(existing) = estabelecimentos::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        if let Some(codigo) = &patch.codigo_unidade {
            active.codigo_unidade = Set(codigo.clone());
        }
        if let Some(cnes) = &patch.codigo_cnes {
            active.codigo_cnes = Set(cnes.clone());
        }
        if let Some(cnpj) = &patch.cnpj_mantenedora {
            active.cnpj_mantenedora = Set(cnpj.clone());
        }
        if let Some(razao) = &patch.nome_razao_social_estabelecimento {
            active.nome_razao_social_estabelecimento = Set(razao.clone());
        }
        if let Some(fantasia) = &patch.nome_fantasia_estabelecimento {
            active.nome_fantasia_estabelecimento = Set(fantasia.clone());
        }
        if let Some(telefone) = &patch.numero_telefone_estabelecimento {
            active.numero_telefone_estabelecimento = Set(telefone.clone());
        }
        if let Some(email) = &patch.email_estabelecimento {
            active.email_estabelecimento = Set(email.clone());
        }
        if let Some(mantenedora_id) = patch.mantenedora_id {
            active.mantenedora_id = Set(mantenedora_id.0);
        }
        active.updated_at = Set(Some(Utc::now().fixed_offset()));

        let result = active.update(&self.db).await.map_err(map_db_err)?;

        Ok(Some(result.into()))
    }

    async fn delete(&self, id: EstabelecimentoId) -> Result<bool, DomainError> {
        let result = estabelecimentos::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl EstabelecimentoRepository for PostgresEstabelecimentoRepository {
    async fn find_by_codigo_unidade(
        &self,
        codigo: &str,
    ) -> Result<Option<Estabelecimento>, DomainError> {
        self.find_one_by(estabelecimentos::Column::CodigoUnidade, codigo)
            .await
    }

    async fn find_by_codigo_cnes(
        &self,
        codigo: &str,
    ) -> Result<Option<Estabelecimento>, DomainError> {
        self.find_one_by(estabelecimentos::Column::CodigoCnes, codigo)
            .await
    }

    async fn sync_cnpj_mantenedora(
        &self,
        mantenedora: MantenedoraId,
        cnpj: &str,
    ) -> Result<u64, DomainError> {
        let result = estabelecimentos::Entity::update_many()
            .col_expr(estabelecimentos::Column::CnpjMantenedora, Expr::value(cnpj))
            .col_expr(
                estabelecimentos::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(estabelecimentos::Column::MantenedoraId.eq(mantenedora.0))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected)
    }
}

/// Convert SeaORM model to domain entity
impl From<estabelecimentos::Model> for Estabelecimento {
    fn from(model: estabelecimentos::Model) -> Self {
        Estabelecimento {
            id: EstabelecimentoId(model.id),
            codigo_unidade: model.codigo_unidade,
            codigo_cnes: model.codigo_cnes,
            cnpj_mantenedora: model.cnpj_mantenedora,
            nome_razao_social_estabelecimento: model.nome_razao_social_estabelecimento,
            nome_fantasia_estabelecimento: model.nome_fantasia_estabelecimento,
            numero_telefone_estabelecimento: model.numero_telefone_estabelecimento,
            email_estabelecimento: model.email_estabelecimento,
            mantenedora_id: MantenedoraId(model.mantenedora_id),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}
