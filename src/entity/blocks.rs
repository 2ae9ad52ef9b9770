//! 课程块实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bloques")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub nombre: String,
    pub orden: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::modules::Entity")]
    Modules,
    #[sea_orm(has_many = "super::exams::Entity")]
    Exams,
}

impl Related<super::modules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Modules.def()
    }
}

impl Related<super::exams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exams.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_block(self) -> crate::models::blocks::entities::Block {
        crate::models::blocks::entities::Block {
            id: self.id,
            name: self.nombre,
            position: self.orden,
            created_at: super::from_millis(self.created_at),
            updated_at: super::from_millis(self.updated_at),
        }
    }
}
