use sea_orm::entity::prelude::*;

/// Team membership; (equipe_id, profissional_id) is unique
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "equipeprofs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub equipe_id: i32,
    pub profissional_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::equipes::Entity",
        from = "Column::EquipeId",
        to = "super::equipes::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Equipe,
    #[sea_orm(
        belongs_to = "super::profissionais::Entity",
        from = "Column::ProfissionalId",
        to = "super::profissionais::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Profissional,
}

impl Related<super::equipes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Equipe.def()
    }
}

impl Related<super::profissionais::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profissional.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
