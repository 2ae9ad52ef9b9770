//! 模块实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "modulos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub bloque_id: i64,
    pub nombre: String,
    pub orden: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::blocks::Entity",
        from = "Column::BloqueId",
        to = "super::blocks::Column::Id"
    )]
    Block,
    #[sea_orm(has_many = "super::exams::Entity")]
    Exams,
}

impl Related<super::blocks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Block.def()
    }
}

impl Related<super::exams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exams.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_module(self) -> crate::models::blocks::entities::Module {
        crate::models::blocks::entities::Module {
            id: self.id,
            block_id: self.bloque_id,
            name: self.nombre,
            position: self.orden,
            created_at: super::from_millis(self.created_at),
            updated_at: super::from_millis(self.updated_at),
        }
    }
}
