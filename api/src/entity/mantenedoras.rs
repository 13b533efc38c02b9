use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "mantenedoras")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub cnpj_mantenedora: String,
    pub nome_razao_social_mantenedora: String,
    pub numero_telefone_mantenedora: Option<String>,
    pub codigo_banco: String,
    pub numero_agencia: String,
    pub numero_conta_corrente: String,
    pub data_criacao_mantenedora: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::estabelecimentos::Entity")]
    Estabelecimentos,
}

impl Related<super::estabelecimentos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Estabelecimentos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
