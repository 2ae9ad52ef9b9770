//! 成绩登记
//!
//! 每次登记都在 (学生, 考试) 锁内完成，存储层再用事务保证计数、写入与降级的原子性。

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use super::EvaluationSequencer;
use crate::errors::{CfpError, Result};
use crate::models::exams::entities::{Exam, ExamOwner, ExamType};
use crate::models::grades::entities::{Grade, NewGrade};

impl EvaluationSequencer {
    /// 登记期中或补考成绩，永不作为最终成绩
    pub async fn record_partial_attempt(
        &self,
        student_id: i64,
        exam_id: i64,
        score: f64,
    ) -> Result<Grade> {
        self.record_partial_attempt_at(student_id, exam_id, score, Utc::now())
            .await
    }

    pub async fn record_partial_attempt_at(
        &self,
        student_id: i64,
        exam_id: i64,
        score: f64,
        graded_at: DateTime<Utc>,
    ) -> Result<Grade> {
        self.ensure_student(student_id).await?;
        let exam = self.load_exam(exam_id).await?;
        exam.ensure_type(&[ExamType::Parcial, ExamType::Recup])?;

        let grade = NewGrade::attempt(exam.id, student_id, score)?.graded_at(graded_at);

        let _guard = self.locks.acquire(student_id, exam.id).await;
        self.persist(&exam, grade).await
    }

    /// 登记线上期末成绩，永不作为最终成绩
    pub async fn record_final_virtual_attempt(
        &self,
        student_id: i64,
        exam_id: i64,
        score: f64,
    ) -> Result<Grade> {
        self.record_final_virtual_attempt_at(student_id, exam_id, score, Utc::now())
            .await
    }

    pub async fn record_final_virtual_attempt_at(
        &self,
        student_id: i64,
        exam_id: i64,
        score: f64,
        graded_at: DateTime<Utc>,
    ) -> Result<Grade> {
        self.ensure_student(student_id).await?;
        let exam = self.load_exam(exam_id).await?;
        exam.ensure_type(&[ExamType::FinalVirtual])?;

        let grade = NewGrade::attempt(exam.id, student_id, score)?.graded_at(graded_at);

        let _guard = self.locks.acquire(student_id, exam.id).await;
        self.persist(&exam, grade).await
    }

    /// 登记同步期末成绩
    ///
    /// 未指定授权成绩时取该课程块最近一次及格的线上期末。及格的成绩成为最终成绩，
    /// 同一 (学生, 考试) 的旧最终成绩随之降级。
    pub async fn record_final_synchronous_attempt(
        &self,
        student_id: i64,
        exam_id: i64,
        score: f64,
        authorizing: Option<i64>,
    ) -> Result<Grade> {
        self.record_final_synchronous_attempt_at(student_id, exam_id, score, authorizing, Utc::now())
            .await
    }

    pub async fn record_final_synchronous_attempt_at(
        &self,
        student_id: i64,
        exam_id: i64,
        score: f64,
        authorizing: Option<i64>,
        graded_at: DateTime<Utc>,
    ) -> Result<Grade> {
        self.ensure_student(student_id).await?;
        let exam = self.load_exam(exam_id).await?;
        exam.ensure_type(&[ExamType::FinalSinc])?;
        let block_id = owning_block(&exam)?;

        let grade = NewGrade::attempt(exam.id, student_id, score)?
            .graded_at(graded_at)
            .definitive_if_passed();

        let _guard = self.locks.acquire(student_id, exam.id).await;

        let authorizing = match authorizing {
            Some(grade_id) => Some(self.check_authorizing_grade(student_id, grade_id).await?),
            None => self
                .storage
                .latest_block_grade(student_id, block_id, ExamType::FinalVirtual, true)
                .await?
                .map(|g| g.id),
        };

        self.persist(&exam, grade.authorized_by(authorizing)).await
    }

    /// 登记等效认定成绩，仅限课程块的期末类考试
    ///
    /// 在同步期末或等效认定考试上及格时成为最终成绩。
    pub async fn record_equivalence(
        &self,
        student_id: i64,
        exam_id: i64,
        score: f64,
        origin: &str,
        reference_date: Option<NaiveDate>,
    ) -> Result<Grade> {
        let origin = origin.trim();
        if origin.is_empty() {
            return Err(CfpError::validation(
                "El origen de la equivalencia es obligatorio",
            ));
        }

        self.ensure_student(student_id).await?;
        let exam = self.load_exam(exam_id).await?;
        exam.ensure_type(ExamType::block_types())?;

        let mut grade = NewGrade::attempt(exam.id, student_id, score)?.equivalence(origin, reference_date);
        if exam.exam_type.can_be_definitive() {
            grade = grade.definitive_if_passed();
        }

        let _guard = self.locks.acquire(student_id, exam.id).await;
        self.persist(&exam, grade).await
    }

    /// 校验资格后登记线上期末
    ///
    /// `submit_*` 是对外的写入路径；`record_*_at` 只用于导入历史数据和测试。
    pub async fn submit_final_virtual(
        &self,
        student_id: i64,
        exam_id: i64,
        score: f64,
        graded_at: DateTime<Utc>,
    ) -> Result<Grade> {
        self.ensure_student(student_id).await?;
        let exam = self.load_exam(exam_id).await?;
        exam.ensure_type(&[ExamType::FinalVirtual])?;
        let structure = self.load_block(owning_block(&exam)?).await?;

        let grade = NewGrade::attempt(exam.id, student_id, score)?.graded_at(graded_at);

        let _guard = self.locks.acquire(student_id, exam.id).await;
        self.ensure_not_backdated(student_id, structure.block.id, graded_at)
            .await?;
        self.check_final_virtual(student_id, &structure)
            .await?
            .into_result()?;

        self.persist(&exam, grade).await
    }

    /// 校验资格后登记同步期末，授权成绩为判定资格时的线上期末
    pub async fn submit_final_synchronous(
        &self,
        student_id: i64,
        exam_id: i64,
        score: f64,
        graded_at: DateTime<Utc>,
    ) -> Result<Grade> {
        self.ensure_student(student_id).await?;
        let exam = self.load_exam(exam_id).await?;
        exam.ensure_type(&[ExamType::FinalSinc])?;
        let structure = self.load_block(owning_block(&exam)?).await?;

        let grade = NewGrade::attempt(exam.id, student_id, score)?
            .graded_at(graded_at)
            .definitive_if_passed();

        let _guard = self.locks.acquire(student_id, exam.id).await;
        self.ensure_not_backdated(student_id, structure.block.id, graded_at)
            .await?;
        let virtual_grade = self
            .check_final_synchronous(student_id, &structure.block)
            .await?
            .into_result()?;

        self.persist(&exam, grade.authorized_by(Some(virtual_grade.id)))
            .await
    }

    /// 按考试类型分派登记
    ///
    /// 等效认定需要来源信息，不走此路径。
    pub async fn submit_attempt(
        &self,
        student_id: i64,
        exam_id: i64,
        score: f64,
        graded_at: DateTime<Utc>,
    ) -> Result<Grade> {
        let exam = self.load_exam(exam_id).await?;

        match exam.exam_type {
            ExamType::Parcial | ExamType::Recup => {
                self.record_partial_attempt_at(student_id, exam_id, score, graded_at)
                    .await
            }
            ExamType::FinalVirtual => {
                self.submit_final_virtual(student_id, exam_id, score, graded_at)
                    .await
            }
            ExamType::FinalSinc => {
                self.submit_final_synchronous(student_id, exam_id, score, graded_at)
                    .await
            }
            ExamType::Equivalencia => Err(CfpError::invalid_exam_type(
                "Las equivalencias se registran con su origen en /equivalences",
            )),
        }
    }

    /// 期末成绩的评分时间不能早于课程块内已登记的任何期末成绩，
    /// 否则补登的不及格同步期末不会让线上期末失效
    async fn ensure_not_backdated(
        &self,
        student_id: i64,
        block_id: i64,
        graded_at: DateTime<Utc>,
    ) -> Result<()> {
        for exam_type in [ExamType::FinalVirtual, ExamType::FinalSinc] {
            let latest = self
                .storage
                .latest_block_grade(student_id, block_id, exam_type, false)
                .await?;

            if let Some(latest) = latest.filter(|g| graded_at < g.graded_at) {
                return Err(CfpError::validation(format!(
                    "La fecha de calificación {} es anterior al último {} registrado ({})",
                    graded_at.to_rfc3339(),
                    exam_type.label(),
                    latest.graded_at.to_rfc3339()
                )));
            }
        }

        Ok(())
    }

    /// 显式给出的授权成绩必须存在，且属于该学生的线上期末
    async fn check_authorizing_grade(&self, student_id: i64, grade_id: i64) -> Result<i64> {
        let grade = self
            .storage
            .get_grade_by_id(grade_id)
            .await?
            .ok_or_else(|| CfpError::not_found(format!("Nota {grade_id} no encontrada")))?;

        if grade.student_id != student_id {
            return Err(CfpError::validation(format!(
                "La nota {grade_id} no pertenece al estudiante {student_id}"
            )));
        }

        let exam = self.load_exam(grade.exam_id).await?;
        if exam.exam_type != ExamType::FinalVirtual {
            return Err(CfpError::validation(format!(
                "La nota {grade_id} no corresponde a un Final Virtual"
            )));
        }

        Ok(grade.id)
    }

    /// 调用方须已持有 (学生, 考试) 锁
    async fn persist(&self, exam: &Exam, grade: NewGrade) -> Result<Grade> {
        let recorded = self.storage.record_grade(grade).await?;

        info!(
            "Recorded {} grade {} for student {} on exam {}: score={}, attempt={}, definitive={}",
            exam.exam_type,
            recorded.id,
            recorded.student_id,
            exam.id,
            recorded.score,
            recorded.attempt,
            recorded.is_definitive
        );
        if exam.exam_type == ExamType::FinalSinc && !recorded.passed {
            info!(
                "Student {} failed synchronous exam {}; Final Virtual must be passed again",
                recorded.student_id, exam.id
            );
        }

        Ok(recorded)
    }
}

fn owning_block(exam: &Exam) -> Result<i64> {
    match exam.owner()? {
        ExamOwner::Block(block_id) => Ok(block_id),
        ExamOwner::Module(_) => Err(CfpError::validation(format!(
            "El examen {} no pertenece a un bloque",
            exam.id
        ))),
    }
}
