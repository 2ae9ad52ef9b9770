use super::SeaOrmStorage;
use crate::entity::exams::{ActiveModel, Column, Entity as Exams};
use crate::errors::{CfpError, Result};
use crate::models::exams::{
    entities::{Exam, ExamOwner},
    requests::{CreateExamRequest, ExamListQuery},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建考试
    pub async fn create_exam_impl(&self, owner: ExamOwner, req: CreateExamRequest) -> Result<Exam> {
        let now = chrono::Utc::now().timestamp_millis();

        let model = ActiveModel {
            modulo_id: Set(owner.module_id()),
            bloque_id: Set(owner.block_id()),
            tipo_examen: Set(req.tipo_examen.to_string()),
            fecha: Set(req.fecha.map(|d| d.format("%Y-%m-%d").to_string())),
            peso: Set(req.peso.unwrap_or(0.0)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CfpError::database_operation(format!("创建考试失败: {e}")))?;

        result.into_exam()
    }

    /// 通过 ID 获取考试
    pub async fn get_exam_by_id_impl(&self, id: i64) -> Result<Option<Exam>> {
        let result = Exams::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CfpError::database_operation(format!("查询考试失败: {e}")))?;

        result.map(|m| m.into_exam()).transpose()
    }

    /// 列出考试
    pub async fn list_exams_impl(&self, query: ExamListQuery) -> Result<Vec<Exam>> {
        let mut select = Exams::find();

        if let Some(module_id) = query.modulo_id {
            select = select.filter(Column::ModuloId.eq(module_id));
        }

        if let Some(block_id) = query.bloque_id {
            select = select.filter(Column::BloqueId.eq(block_id));
        }

        if let Some(exam_type) = query.tipo_examen {
            select = select.filter(Column::TipoExamen.eq(exam_type.to_string()));
        }

        let exams = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CfpError::database_operation(format!("查询考试列表失败: {e}")))?;

        exams.into_iter().map(|m| m.into_exam()).collect()
    }
}
