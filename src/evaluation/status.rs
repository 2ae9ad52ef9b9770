//! 课程块评估状态汇总

use tracing::debug;

use super::EvaluationSequencer;
use crate::errors::Result;
use crate::models::grades::entities::Grade;

const CAN_SIT_VIRTUAL: &str = "Puede rendir Final Virtual";
const CAN_SIT_SYNCHRONOUS: &str = "Puede rendir Final Sincrónico";
const SYNCHRONOUS_ELIGIBLE: &str = "El estudiante puede rendir el Final Sincrónico";

/// 学生在课程块上的评估状态
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationStatus {
    pub passed: bool,
    pub final_grade: Option<Grade>,
    pub can_sit_virtual: bool,
    pub can_sit_synchronous: bool,
    /// 已通过课程块时不再计算资格，两条消息为空
    pub virtual_message: Option<String>,
    pub synchronous_message: Option<String>,
    pub next_step: String,
    pub history: Vec<Grade>,
}

impl EvaluationStatus {
    pub fn final_score(&self) -> Option<f64> {
        self.final_grade.as_ref().map(|g| g.score)
    }
}

impl EvaluationSequencer {
    /// 课程块的最终成绩（同步期末或等效认定）
    pub async fn definitive_grade_for_block(
        &self,
        student_id: i64,
        block_id: i64,
    ) -> Result<Option<Grade>> {
        self.ensure_student(student_id).await?;
        self.load_block(block_id).await?;
        self.storage
            .definitive_block_grade(student_id, block_id)
            .await
    }

    /// 课程块及其模块上的全部成绩，按评分时间升序
    pub async fn attempt_history(&self, student_id: i64, block_id: i64) -> Result<Vec<Grade>> {
        self.ensure_student(student_id).await?;
        self.load_block(block_id).await?;
        self.storage
            .list_block_grade_history(student_id, block_id)
            .await
    }

    /// 汇总评估状态
    ///
    /// 下一步的优先级：已通过 > 同步期末 > 线上期末 > 线上期末不具备资格的原因。
    pub async fn evaluation_status(
        &self,
        student_id: i64,
        block_id: i64,
    ) -> Result<EvaluationStatus> {
        self.ensure_student(student_id).await?;
        let structure = self.load_block(block_id).await?;
        let history = self
            .storage
            .list_block_grade_history(student_id, block_id)
            .await?;

        if let Some(definitive) = self
            .storage
            .definitive_block_grade(student_id, block_id)
            .await?
        {
            return Ok(EvaluationStatus {
                passed: true,
                next_step: format!("Bloque aprobado con nota {:.2}", definitive.score),
                final_grade: Some(definitive),
                can_sit_virtual: false,
                can_sit_synchronous: false,
                virtual_message: None,
                synchronous_message: None,
                history,
            });
        }

        let virtual_check = self.check_final_virtual(student_id, &structure).await?;
        let synchronous_check = self
            .check_final_synchronous(student_id, &structure.block)
            .await?;

        let can_sit_virtual = virtual_check.is_eligible();
        let can_sit_synchronous = synchronous_check.is_eligible();

        let virtual_message = match virtual_check.reason() {
            None => CAN_SIT_VIRTUAL.to_string(),
            Some(reason) => reason.to_string(),
        };
        let synchronous_message = match synchronous_check.reason() {
            None => SYNCHRONOUS_ELIGIBLE.to_string(),
            Some(reason) => reason.to_string(),
        };

        let next_step = if can_sit_synchronous {
            CAN_SIT_SYNCHRONOUS.to_string()
        } else if can_sit_virtual {
            CAN_SIT_VIRTUAL.to_string()
        } else {
            virtual_message.clone()
        };

        debug!(
            "Evaluation status for student {} in block {}: virtual={}, synchronous={}",
            student_id, block_id, can_sit_virtual, can_sit_synchronous
        );

        Ok(EvaluationStatus {
            passed: false,
            final_grade: None,
            can_sit_virtual,
            can_sit_synchronous,
            virtual_message: Some(virtual_message),
            synchronous_message: Some(synchronous_message),
            next_step,
            history,
        })
    }
}
