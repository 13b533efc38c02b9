use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profissionais")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub codigo_profissional_sus: String,
    pub nome_profissional: String,
    pub codigo_cns: Option<String>,
    pub situacao_profissional_cadsus: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::equipeprofs::Entity")]
    Equipeprofs,
}

impl Related<super::equipeprofs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Equipeprofs.def()
    }
}

impl Related<super::equipes::Entity> for Entity {
    fn to() -> RelationDef {
        super::equipeprofs::Relation::Equipe.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::equipeprofs::Relation::Profissional.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
