//! 考试实体

use sea_orm::entity::prelude::*;

use crate::errors::{CfpError, Result as CfpResult};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "examenes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub modulo_id: Option<i64>,
    pub bloque_id: Option<i64>,
    pub tipo_examen: String,
    pub fecha: Option<String>,
    pub peso: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::modules::Entity",
        from = "Column::ModuloId",
        to = "super::modules::Column::Id"
    )]
    Module,
    #[sea_orm(
        belongs_to = "super::blocks::Entity",
        from = "Column::BloqueId",
        to = "super::blocks::Column::Id"
    )]
    Block,
    #[sea_orm(has_many = "super::grades::Entity")]
    Grades,
}

impl Related<super::modules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Module.def()
    }
}

impl Related<super::blocks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Block.def()
    }
}

impl Related<super::grades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grades.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_exam(self) -> CfpResult<crate::models::exams::entities::Exam> {
        use crate::models::exams::entities::{Exam, ExamType};

        let exam_type = self
            .tipo_examen
            .parse::<ExamType>()
            .map_err(CfpError::database_operation)?;
        let exam_date = self
            .fecha
            .as_deref()
            .map(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d"))
            .transpose()?;

        Ok(Exam {
            id: self.id,
            module_id: self.modulo_id,
            block_id: self.bloque_id,
            exam_type,
            exam_date,
            weight: self.peso,
            created_at: super::from_millis(self.created_at),
            updated_at: super::from_millis(self.updated_at),
        })
    }
}
