use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "enderecos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub cep_estabelecimento: String,
    pub bairro: String,
    pub logradouro: String,
    pub numero: String,
    pub complemento: Option<String>,
    #[sea_orm(unique)]
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
}

impl Related<super::estabelecimentos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Estabelecimento.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
