use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "equipes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub codigo_equipe: String,
    pub nome_equipe: String,
    pub tipo_equipe: String,
    pub estabelecimento_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::estabelecimentos::Entity",
        from = "Column::EstabelecimentoId",
        to = "super::estabelecimentos::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Estabelecimento,
    #[sea_orm(has_many = "super::equipeprofs::Entity")]
    Equipeprofs,
}

impl Related<super::estabelecimentos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Estabelecimento.def()
    }
}

impl Related<super::equipeprofs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Equipeprofs.def()
    }
}

impl Related<super::profissionais::Entity> for Entity {
    fn to() -> RelationDef {
        super::equipeprofs::Relation::Profissional.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::equipeprofs::Relation::Equipe.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
