//! 学生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "estudiantes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub dni: String,
    #[sea_orm(unique)]
    pub email: String,
    pub nombre: String,
    pub apellido: String,
    pub estatus: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::grades::Entity")]
    Grades,
}

impl Related<super::grades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grades.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_student(self) -> crate::models::students::entities::Student {
        use crate::models::students::entities::{Student, StudentStatus};

        Student {
            id: self.id,
            dni: self.dni,
            email: self.email,
            first_name: self.nombre,
            last_name: self.apellido,
            status: self
                .estatus
                .parse::<StudentStatus>()
                .unwrap_or(StudentStatus::Regular),
            created_at: super::from_millis(self.created_at),
            updated_at: super::from_millis(self.updated_at),
        }
    }
}
