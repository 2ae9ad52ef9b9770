//! 评估流程引擎
//!
//! 管理学生在课程块内的考试顺序：期中 → 补考 → 线上期末 → 同步期末。
//! 所有资格规则、尝试序号与最终成绩的判定都集中在这里。

pub mod eligibility;
pub mod locks;
pub mod recording;
pub mod status;

use std::sync::Arc;

use crate::errors::{CfpError, Result};
use crate::models::blocks::entities::BlockStructure;
use crate::models::exams::entities::Exam;
use crate::models::students::entities::Student;
use crate::storage::Storage;

pub use eligibility::{Eligibility, IneligibleReason};
pub use locks::AttemptLocks;
pub use status::EvaluationStatus;

pub struct EvaluationSequencer {
    storage: Arc<dyn Storage>,
    locks: AttemptLocks,
}

impl EvaluationSequencer {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            locks: AttemptLocks::new(),
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// 加载课程块及其按顺序排列的模块
    pub(crate) async fn load_block(&self, block_id: i64) -> Result<BlockStructure> {
        let block = self
            .storage
            .get_block_by_id(block_id)
            .await?
            .ok_or_else(|| CfpError::not_found(format!("Bloque {block_id} no encontrado")))?;
        let modules = self.storage.list_block_modules(block_id).await?;

        Ok(BlockStructure { block, modules })
    }

    pub(crate) async fn load_exam(&self, exam_id: i64) -> Result<Exam> {
        self.storage
            .get_exam_by_id(exam_id)
            .await?
            .ok_or_else(|| CfpError::not_found(format!("Examen {exam_id} no encontrado")))
    }

    pub(crate) async fn ensure_student(&self, student_id: i64) -> Result<Student> {
        self.storage
            .get_student_by_id(student_id)
            .await?
            .ok_or_else(|| CfpError::not_found(format!("Estudiante {student_id} no encontrado")))
    }
}
