use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "estabelecimentos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub codigo_unidade: String,
    #[sea_orm(unique)]
    pub codigo_cnes: String,
    pub cnpj_mantenedora: String,
    pub nome_razao_social_estabelecimento: String,
    pub nome_fantasia_estabelecimento: String,
    pub numero_telefone_estabelecimento: Option<String>,
    pub email_estabelecimento: Option<String>,
    pub mantenedora_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::mantenedoras::Entity",
        from = "Column::MantenedoraId",
        to = "super::mantenedoras::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Mantenedora,
    #[sea_orm(has_one = "super::enderecos::Entity")]
    Endereco,
    #[sea_orm(has_many = "super::equipes::Entity")]
    Equipes,
}

impl Related<super::mantenedoras::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mantenedora.def()
    }
}

impl Related<super::enderecos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Endereco.def()
    }
}

impl Related<super::equipes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Equipes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
