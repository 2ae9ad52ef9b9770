//! 成绩存储操作

use super::SeaOrmStorage;
use crate::entity::exams::{Column as ExamColumn, Entity as Exams};
use crate::entity::grades::{ActiveModel, Column, Entity as Grades, Relation};
use crate::entity::modules::{Column as ModuleColumn, Entity as Modules};
use crate::errors::{CfpError, Result};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    exams::entities::ExamType,
    grades::{
        entities::{Grade, NewGrade},
        requests::GradeListQuery,
        responses::GradeListResponse,
    },
};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 通过 ID 获取成绩
    pub async fn get_grade_by_id_impl(&self, grade_id: i64) -> Result<Option<Grade>> {
        let result = Grades::find_by_id(grade_id)
            .one(&self.db)
            .await
            .map_err(|e| CfpError::database_operation(format!("查询成绩失败: {e}")))?;

        result.map(|m| m.into_grade()).transpose()
    }

    /// 列出成绩（分页）
    pub async fn list_grades_with_pagination_impl(
        &self,
        query: GradeListQuery,
    ) -> Result<GradeListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Grades::find();

        // 按模块或课程块筛选时需要 join examenes 表
        if query.modulo_id.is_some() || query.bloque_id.is_some() {
            select = select.join(JoinType::InnerJoin, Relation::Exam.def());

            if let Some(module_id) = query.modulo_id {
                select = select.filter(ExamColumn::ModuloId.eq(module_id));
            }

            if let Some(block_id) = query.bloque_id {
                select = select.filter(ExamColumn::BloqueId.eq(block_id));
            }
        }

        if let Some(exam_id) = query.examen_id {
            select = select.filter(Column::ExamenId.eq(exam_id));
        }

        if let Some(student_id) = query.estudiante_id {
            select = select.filter(Column::EstudianteId.eq(student_id));
        }

        if let Some(passed) = query.aprobado {
            select = select.filter(Column::Aprobado.eq(passed));
        }

        // 排序
        select = select
            .order_by_desc(Column::FechaCalificacion)
            .order_by_desc(Column::Id);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CfpError::database_operation(format!("查询成绩总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| CfpError::database_operation(format!("查询成绩页数失败: {e}")))?;

        let grades = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CfpError::database_operation(format!("查询成绩列表失败: {e}")))?;

        Ok(GradeListResponse {
            items: grades
                .into_iter()
                .map(|m| m.into_grade())
                .collect::<Result<Vec<_>>>()?,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 学生是否至少通过一次模块的某类考试
    pub async fn has_passed_module_exam_impl(
        &self,
        student_id: i64,
        module_id: i64,
        exam_type: ExamType,
    ) -> Result<bool> {
        let count = Grades::find()
            .join(JoinType::InnerJoin, Relation::Exam.def())
            .filter(Column::EstudianteId.eq(student_id))
            .filter(Column::Aprobado.eq(true))
            .filter(ExamColumn::ModuloId.eq(module_id))
            .filter(ExamColumn::TipoExamen.eq(exam_type.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| CfpError::database_operation(format!("查询模块成绩失败: {e}")))?;

        Ok(count > 0)
    }

    /// 课程块某类考试的最新成绩（评分时间倒序，ID 倒序）
    pub async fn latest_block_grade_impl(
        &self,
        student_id: i64,
        block_id: i64,
        exam_type: ExamType,
        passed_only: bool,
    ) -> Result<Option<Grade>> {
        let mut select = Self::block_grades(student_id, block_id)
            .filter(ExamColumn::TipoExamen.eq(exam_type.to_string()));

        if passed_only {
            select = select.filter(Column::Aprobado.eq(true));
        }

        let result = select
            .order_by_desc(Column::FechaCalificacion)
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| CfpError::database_operation(format!("查询最新成绩失败: {e}")))?;

        result.map(|m| m.into_grade()).transpose()
    }

    /// 排在给定成绩之后（评分时间更晚，同一时间则 ID 更大）是否存在不及格成绩
    pub async fn has_failed_block_grade_after_impl(
        &self,
        student_id: i64,
        block_id: i64,
        exam_type: ExamType,
        after: &Grade,
    ) -> Result<bool> {
        let after_ms = after.graded_at.timestamp_millis();
        let later = Condition::any()
            .add(Column::FechaCalificacion.gt(after_ms))
            .add(
                Condition::all()
                    .add(Column::FechaCalificacion.eq(after_ms))
                    .add(Column::Id.gt(after.id)),
            );

        let count = Self::block_grades(student_id, block_id)
            .filter(ExamColumn::TipoExamen.eq(exam_type.to_string()))
            .filter(Column::Aprobado.eq(false))
            .filter(later)
            .count(&self.db)
            .await
            .map_err(|e| CfpError::database_operation(format!("查询不及格成绩失败: {e}")))?;

        Ok(count > 0)
    }

    /// 课程块的最终成绩：同步期末或等效认定中已及格且标记为最终的最新一条
    pub async fn definitive_block_grade_impl(
        &self,
        student_id: i64,
        block_id: i64,
    ) -> Result<Option<Grade>> {
        let result = Self::block_grades(student_id, block_id)
            .filter(ExamColumn::TipoExamen.is_in(Self::definitive_types()))
            .filter(Column::Aprobado.eq(true))
            .filter(Column::EsNotaDefinitiva.eq(true))
            .order_by_desc(Column::FechaCalificacion)
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| CfpError::database_operation(format!("查询最终成绩失败: {e}")))?;

        result.map(|m| m.into_grade()).transpose()
    }

    /// 课程块及其模块下的全部成绩，评分时间升序
    pub async fn list_block_grade_history_impl(
        &self,
        student_id: i64,
        block_id: i64,
    ) -> Result<Vec<Grade>> {
        let module_ids = Modules::find()
            .select_only()
            .column(ModuleColumn::Id)
            .filter(ModuleColumn::BloqueId.eq(block_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| CfpError::database_operation(format!("查询模块失败: {e}")))?;

        let mut owner = Condition::any().add(ExamColumn::BloqueId.eq(block_id));
        if !module_ids.is_empty() {
            owner = owner.add(ExamColumn::ModuloId.is_in(module_ids));
        }

        let grades = Grades::find()
            .join(JoinType::InnerJoin, Relation::Exam.def())
            .filter(Column::EstudianteId.eq(student_id))
            .filter(owner)
            .order_by_asc(Column::FechaCalificacion)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CfpError::database_operation(format!("查询成绩历史失败: {e}")))?;

        grades.into_iter().map(|m| m.into_grade()).collect()
    }

    /// 写入一次考试尝试
    ///
    /// 在同一事务内：统计 (学生, 考试) 已有尝试数得到 `intento`，插入新成绩；
    /// 若新成绩为最终成绩，则把同一 (学生, 考试) 的其他最终成绩降级。
    pub async fn record_grade_impl(&self, grade: NewGrade) -> Result<Grade> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CfpError::database_operation(format!("开启事务失败: {e}")))?;

        let inserted = Self::insert_attempt(&txn, grade).await?;

        txn.commit()
            .await
            .map_err(|e| CfpError::database_operation(format!("提交事务失败: {e}")))?;

        inserted.into_grade()
    }

    async fn insert_attempt<C: ConnectionTrait>(
        conn: &C,
        grade: NewGrade,
    ) -> Result<crate::entity::grades::Model> {
        let previous = Grades::find()
            .filter(Column::ExamenId.eq(grade.exam_id))
            .filter(Column::EstudianteId.eq(grade.student_id))
            .count(conn)
            .await
            .map_err(|e| CfpError::database_operation(format!("统计尝试次数失败: {e}")))?;

        let now = Utc::now().timestamp_millis();
        let (is_equivalence, origin, reference_date) = match grade.equivalence {
            Some(info) => (
                true,
                info.origin,
                info.reference_date.map(|d| d.format("%Y-%m-%d").to_string()),
            ),
            None => (false, String::new(), None),
        };

        let model = ActiveModel {
            examen_id: Set(grade.exam_id),
            estudiante_id: Set(grade.student_id),
            calificacion: Set(grade.score),
            aprobado: Set(grade.passed),
            fecha_calificacion: Set(grade.graded_at.timestamp_millis()),
            intento: Set(previous as i32 + 1),
            es_nota_definitiva: Set(grade.is_definitive),
            habilitado_por_id: Set(grade.authorized_by),
            es_equivalencia: Set(is_equivalence),
            origen_equivalencia: Set(origin),
            fecha_ref_equivalencia: Set(reference_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = model
            .insert(conn)
            .await
            .map_err(|e| CfpError::database_operation(format!("写入成绩失败: {e}")))?;

        if inserted.es_nota_definitiva {
            // 等效认定成为最终成绩时，整个课程块只保留这一条最终成绩
            let exam_ids = if inserted.es_equivalencia {
                Self::definitive_exam_ids_of_block(conn, inserted.examen_id).await?
            } else {
                vec![inserted.examen_id]
            };

            Grades::update_many()
                .col_expr(Column::EsNotaDefinitiva, Expr::value(false))
                .col_expr(Column::UpdatedAt, Expr::value(now))
                .filter(Column::ExamenId.is_in(exam_ids))
                .filter(Column::EstudianteId.eq(inserted.estudiante_id))
                .filter(Column::EsNotaDefinitiva.eq(true))
                .filter(Column::Id.ne(inserted.id))
                .exec(conn)
                .await
                .map_err(|e| CfpError::database_operation(format!("降级旧最终成绩失败: {e}")))?;
        }

        Ok(inserted)
    }

    /// 与给定考试同属一个课程块、可产生最终成绩的考试（同步期末与等效认定）
    async fn definitive_exam_ids_of_block<C: ConnectionTrait>(
        conn: &C,
        exam_id: i64,
    ) -> Result<Vec<i64>> {
        let block_id = Exams::find_by_id(exam_id)
            .select_only()
            .column(ExamColumn::BloqueId)
            .into_tuple::<Option<i64>>()
            .one(conn)
            .await
            .map_err(|e| CfpError::database_operation(format!("查询考试失败: {e}")))?
            .flatten();

        let Some(block_id) = block_id else {
            return Ok(vec![exam_id]);
        };

        Exams::find()
            .select_only()
            .column(ExamColumn::Id)
            .filter(ExamColumn::BloqueId.eq(block_id))
            .filter(ExamColumn::TipoExamen.is_in(Self::definitive_types()))
            .into_tuple::<i64>()
            .all(conn)
            .await
            .map_err(|e| CfpError::database_operation(format!("查询课程块考试失败: {e}")))
    }

    fn definitive_types() -> Vec<String> {
        [ExamType::FinalSinc, ExamType::Equivalencia]
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    /// 学生在某课程块自有考试上的成绩
    fn block_grades(student_id: i64, block_id: i64) -> Select<Grades> {
        Grades::find()
            .join(JoinType::InnerJoin, Relation::Exam.def())
            .filter(Column::EstudianteId.eq(student_id))
            .filter(ExamColumn::BloqueId.eq(block_id))
    }
}
