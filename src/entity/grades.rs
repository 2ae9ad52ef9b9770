//! 成绩实体

use sea_orm::entity::prelude::*;

use crate::errors::Result as CfpResult;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub examen_id: i64,
    pub estudiante_id: i64,
    pub calificacion: f64,
    pub aprobado: bool,
    pub fecha_calificacion: i64,
    pub intento: i32,
    pub es_nota_definitiva: bool,
    pub habilitado_por_id: Option<i64>,
    pub es_equivalencia: bool,
    pub origen_equivalencia: String,
    pub fecha_ref_equivalencia: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exams::Entity",
        from = "Column::ExamenId",
        to = "super::exams::Column::Id"
    )]
    Exam,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::EstudianteId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl Related<super::exams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exam.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_grade(self) -> CfpResult<crate::models::grades::entities::Grade> {
        let equivalence_date = self
            .fecha_ref_equivalencia
            .as_deref()
            .map(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d"))
            .transpose()?;

        Ok(crate::models::grades::entities::Grade {
            id: self.id,
            exam_id: self.examen_id,
            student_id: self.estudiante_id,
            score: self.calificacion,
            passed: self.aprobado,
            graded_at: super::from_millis(self.fecha_calificacion),
            attempt: self.intento,
            is_definitive: self.es_nota_definitiva,
            authorized_by: self.habilitado_por_id,
            is_equivalence: self.es_equivalencia,
            equivalence_origin: self.origen_equivalencia,
            equivalence_date,
        })
    }
}
