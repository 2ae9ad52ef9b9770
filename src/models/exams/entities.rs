use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{CfpError, Result};

// 考试类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "exam.ts")]
pub enum ExamType {
    Parcial,      // 模块期中考试
    Recup,        // 模块补考
    FinalVirtual, // 课程块线上期末
    FinalSinc,    // 课程块同步期末
    Equivalencia, // 学分等效认定
}

impl ExamType {
    pub const PARCIAL: &'static str = "PARCIAL";
    pub const RECUP: &'static str = "RECUP";
    pub const FINAL_VIRTUAL: &'static str = "FINAL_VIRTUAL";
    pub const FINAL_SINC: &'static str = "FINAL_SINC";
    pub const EQUIVALENCIA: &'static str = "EQUIVALENCIA";

    /// 模块下允许的考试类型
    pub fn module_types() -> &'static [ExamType] {
        &[ExamType::Parcial, ExamType::Recup]
    }

    /// 课程块下允许的考试类型
    pub fn block_types() -> &'static [ExamType] {
        &[
            ExamType::FinalVirtual,
            ExamType::FinalSinc,
            ExamType::Equivalencia,
        ]
    }

    pub fn is_module_type(&self) -> bool {
        Self::module_types().contains(self)
    }

    pub fn is_final_type(&self) -> bool {
        Self::block_types().contains(self)
    }

    /// 该类型考试的通过成绩能否成为课程块的最终成绩
    pub fn can_be_definitive(&self) -> bool {
        matches!(self, ExamType::FinalSinc | ExamType::Equivalencia)
    }

    /// 面向用户的名称
    pub fn label(&self) -> &'static str {
        match self {
            ExamType::Parcial => "Parcial",
            ExamType::Recup => "Recuperatorio",
            ExamType::FinalVirtual => "Final Virtual",
            ExamType::FinalSinc => "Final Sincrónico",
            ExamType::Equivalencia => "Equivalencia",
        }
    }
}

impl std::fmt::Display for ExamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExamType::Parcial => write!(f, "{}", ExamType::PARCIAL),
            ExamType::Recup => write!(f, "{}", ExamType::RECUP),
            ExamType::FinalVirtual => write!(f, "{}", ExamType::FINAL_VIRTUAL),
            ExamType::FinalSinc => write!(f, "{}", ExamType::FINAL_SINC),
            ExamType::Equivalencia => write!(f, "{}", ExamType::EQUIVALENCIA),
        }
    }
}

impl std::str::FromStr for ExamType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            ExamType::PARCIAL => Ok(ExamType::Parcial),
            ExamType::RECUP => Ok(ExamType::Recup),
            ExamType::FINAL_VIRTUAL => Ok(ExamType::FinalVirtual),
            ExamType::FINAL_SINC => Ok(ExamType::FinalSinc),
            ExamType::EQUIVALENCIA => Ok(ExamType::Equivalencia),
            _ => Err(format!("Invalid exam type: {s}")),
        }
    }
}

/// 考试归属：模块或课程块，二者必居其一
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamOwner {
    Module(i64),
    Block(i64),
}

impl ExamOwner {
    /// 由可选的父级 ID 构造归属，两者都给或都不给时报错
    pub fn from_parents(module_id: Option<i64>, block_id: Option<i64>) -> Result<Self> {
        match (module_id, block_id) {
            (Some(module_id), None) => Ok(ExamOwner::Module(module_id)),
            (None, Some(block_id)) => Ok(ExamOwner::Block(block_id)),
            (Some(_), Some(_)) => Err(CfpError::validation(
                "Un examen no puede pertenecer a un módulo y a un bloque a la vez",
            )),
            (None, None) => Err(CfpError::validation(
                "Un examen debe estar asociado a un módulo o a un bloque",
            )),
        }
    }

    /// 校验考试类型与归属是否匹配
    pub fn check_type(&self, exam_type: ExamType) -> Result<()> {
        match self {
            ExamOwner::Module(_) if !exam_type.is_module_type() => Err(CfpError::validation(
                "Los exámenes de módulo solo pueden ser Parcial o Recuperatorio",
            )),
            ExamOwner::Block(_) if !exam_type.is_final_type() => Err(CfpError::validation(
                "Los exámenes de bloque solo pueden ser Final Virtual, Final Sincrónico o Equivalencia",
            )),
            _ => Ok(()),
        }
    }

    pub fn module_id(&self) -> Option<i64> {
        match self {
            ExamOwner::Module(id) => Some(*id),
            ExamOwner::Block(_) => None,
        }
    }

    pub fn block_id(&self) -> Option<i64> {
        match self {
            ExamOwner::Block(id) => Some(*id),
            ExamOwner::Module(_) => None,
        }
    }
}

// 考试
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct Exam {
    pub id: i64,
    #[serde(rename = "modulo_id")]
    pub module_id: Option<i64>,
    #[serde(rename = "bloque_id")]
    pub block_id: Option<i64>,
    #[serde(rename = "tipo_examen")]
    pub exam_type: ExamType,
    #[serde(rename = "fecha")]
    pub exam_date: Option<chrono::NaiveDate>,
    #[serde(rename = "peso")]
    pub weight: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Exam {
    /// 考试归属（存储层保证二选一）
    pub fn owner(&self) -> Result<ExamOwner> {
        ExamOwner::from_parents(self.module_id, self.block_id)
    }

    /// 校验考试类型，不符合时返回 InvalidExamType
    pub fn ensure_type(&self, allowed: &[ExamType]) -> Result<()> {
        if allowed.contains(&self.exam_type) {
            Ok(())
        } else {
            let expected = allowed
                .iter()
                .map(|t| t.label())
                .collect::<Vec<_>>()
                .join(" o ");
            Err(CfpError::invalid_exam_type(format!(
                "El examen {} es de tipo {}; se esperaba {}",
                self.id,
                self.exam_type.label(),
                expected
            )))
        }
    }
}
