//! 考试资格判定
//!
//! 线上期末：多模块课程块要求每个模块的期中考试至少及格一次。
//! 同步期末：最近一次线上期末必须及格，且其后没有不及格的同步期末。

use std::fmt;

use tracing::debug;

use super::EvaluationSequencer;
use crate::errors::{CfpError, Result};
use crate::models::blocks::entities::{Block, BlockStructure};
use crate::models::exams::entities::ExamType;
use crate::models::grades::entities::Grade;

/// 资格判定结果，`T` 为具备资格时携带的凭据
#[derive(Debug, Clone, PartialEq)]
pub enum Eligibility<T = ()> {
    Eligible(T),
    Ineligible(IneligibleReason),
}

impl<T> Eligibility<T> {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible(_))
    }

    pub fn reason(&self) -> Option<&IneligibleReason> {
        match self {
            Eligibility::Eligible(_) => None,
            Eligibility::Ineligible(reason) => Some(reason),
        }
    }

    /// 不具备资格时转换为 `CfpError::Ineligible`
    pub fn into_result(self) -> Result<T> {
        match self {
            Eligibility::Eligible(value) => Ok(value),
            Eligibility::Ineligible(reason) => Err(CfpError::ineligible(reason.to_string())),
        }
    }
}

/// 不具备资格的原因
#[derive(Debug, Clone, PartialEq)]
pub enum IneligibleReason {
    /// 某模块的期中考试尚未及格
    PartialNotPassed { block: String, module: String },
    /// 尚未参加线上期末
    VirtualNotTaken { block: String },
    /// 最近一次线上期末不及格
    VirtualNotPassed { block: String, score: f64 },
    /// 线上期末及格之后同步期末不及格，需要重新通过线上期末
    VirtualInvalidated { block: String },
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IneligibleReason::PartialNotPassed { block, module } => write!(
                f,
                "El estudiante debe aprobar el parcial del módulo '{module}' antes de rendir el Final Virtual del bloque '{block}'"
            ),
            IneligibleReason::VirtualNotTaken { block } => write!(
                f,
                "El estudiante debe rendir primero el Final Virtual del bloque '{block}'"
            ),
            IneligibleReason::VirtualNotPassed { block, score } => write!(
                f,
                "El estudiante debe aprobar el Final Virtual del bloque '{block}' (nota actual: {score:.2})"
            ),
            IneligibleReason::VirtualInvalidated { block } => write!(
                f,
                "El estudiante desaprobó un intento de Final Sincrónico después del último Virtual aprobado. Debe volver a rendir el Final Virtual del bloque '{block}'"
            ),
        }
    }
}

impl EvaluationSequencer {
    /// 学生能否参加课程块的线上期末
    pub async fn eligible_for_final_virtual(
        &self,
        student_id: i64,
        block_id: i64,
    ) -> Result<Eligibility> {
        self.ensure_student(student_id).await?;
        let structure = self.load_block(block_id).await?;
        self.check_final_virtual(student_id, &structure).await
    }

    /// 学生能否参加课程块的同步期末，具备资格时返回授权的线上期末成绩
    pub async fn eligible_for_final_synchronous(
        &self,
        student_id: i64,
        block_id: i64,
    ) -> Result<Eligibility<Grade>> {
        self.ensure_student(student_id).await?;
        let structure = self.load_block(block_id).await?;
        self.check_final_synchronous(student_id, &structure.block)
            .await
    }

    pub(crate) async fn check_final_virtual(
        &self,
        student_id: i64,
        structure: &BlockStructure,
    ) -> Result<Eligibility> {
        if !structure.requires_partials() {
            return Ok(Eligibility::Eligible(()));
        }

        for module in &structure.modules {
            let passed = self
                .storage
                .has_passed_module_exam(student_id, module.id, ExamType::Parcial)
                .await?;

            if !passed {
                debug!(
                    "Student {} has not passed the partial of module {} (block {})",
                    student_id, module.id, structure.block.id
                );
                return Ok(Eligibility::Ineligible(IneligibleReason::PartialNotPassed {
                    block: structure.block.name.clone(),
                    module: module.name.clone(),
                }));
            }
        }

        Ok(Eligibility::Eligible(()))
    }

    pub(crate) async fn check_final_synchronous(
        &self,
        student_id: i64,
        block: &Block,
    ) -> Result<Eligibility<Grade>> {
        let latest_virtual = self
            .storage
            .latest_block_grade(student_id, block.id, ExamType::FinalVirtual, false)
            .await?;

        let Some(virtual_grade) = latest_virtual else {
            return Ok(Eligibility::Ineligible(IneligibleReason::VirtualNotTaken {
                block: block.name.clone(),
            }));
        };

        if !virtual_grade.passed {
            return Ok(Eligibility::Ineligible(IneligibleReason::VirtualNotPassed {
                block: block.name.clone(),
                score: virtual_grade.score,
            }));
        }

        // 同步期末不及格会让授权它的线上期末失效
        let failed_after = self
            .storage
            .has_failed_block_grade_after(student_id, block.id, ExamType::FinalSinc, &virtual_grade)
            .await?;

        if failed_after {
            debug!(
                "Virtual grade {} invalidated by a later failed synchronous attempt",
                virtual_grade.id
            );
            return Ok(Eligibility::Ineligible(IneligibleReason::VirtualInvalidated {
                block: block.name.clone(),
            }));
        }

        Ok(Eligibility::Eligible(virtual_grade))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_result_maps_to_ineligible_error() {
        let ok: Eligibility<i64> = Eligibility::Eligible(5);
        assert_eq!(ok.into_result().unwrap(), 5);

        let no: Eligibility<i64> = Eligibility::Ineligible(IneligibleReason::VirtualNotTaken {
            block: "B1".to_string(),
        });
        let err = no.into_result().unwrap_err();
        assert_eq!(err.code(), "E007");
        assert!(err.message().contains("'B1'"));
    }

    #[test]
    fn test_reason_messages_name_the_blocker() {
        let partial = IneligibleReason::PartialNotPassed {
            block: "B1".to_string(),
            module: "M2".to_string(),
        };
        assert!(partial.to_string().contains("'M2'"));

        let failed = IneligibleReason::VirtualNotPassed {
            block: "B1".to_string(),
            score: 4.5,
        };
        assert!(failed.to_string().contains("4.50"));
    }
}
