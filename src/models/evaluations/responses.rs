use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::evaluation::{Eligibility, EvaluationStatus};
use crate::models::grades::entities::Grade;

// 成绩登记结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct RecordGradeResponse {
    pub nota_id: i64,
    pub calificacion: f64,
    pub aprobado: bool,
    pub es_nota_definitiva: bool,
    pub intento: i32,
    pub mensaje: String,
}

impl From<Grade> for RecordGradeResponse {
    fn from(grade: Grade) -> Self {
        let mensaje = if grade.is_definitive {
            format!("Nota definitiva registrada: {:.2}", grade.score)
        } else if grade.passed {
            format!("Examen aprobado (intento {})", grade.attempt)
        } else {
            format!("Examen desaprobado (intento {})", grade.attempt)
        };

        Self {
            nota_id: grade.id,
            calificacion: grade.score,
            aprobado: grade.passed,
            es_nota_definitiva: grade.is_definitive,
            intento: grade.attempt,
            mensaje,
        }
    }
}

// 课程块评估状态
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct EvaluationStatusResponse {
    pub aprobado: bool,
    pub nota_final: Option<f64>,
    pub puede_virtual: bool,
    pub puede_sincronico: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje_virtual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje_sincronico: Option<String>,
    pub siguiente_paso: String,
    pub historial: Vec<Grade>,
}

impl From<EvaluationStatus> for EvaluationStatusResponse {
    fn from(status: EvaluationStatus) -> Self {
        Self {
            aprobado: status.passed,
            nota_final: status.final_score(),
            puede_virtual: status.can_sit_virtual,
            puede_sincronico: status.can_sit_synchronous,
            mensaje_virtual: status.virtual_message,
            mensaje_sincronico: status.synchronous_message,
            siguiente_paso: status.next_step,
            historial: status.history,
        }
    }
}

// 课程块最终成绩
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct DefinitiveGradeResponse {
    pub tiene_nota: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calificacion: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intento: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nota_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

impl From<Option<Grade>> for DefinitiveGradeResponse {
    fn from(grade: Option<Grade>) -> Self {
        match grade {
            Some(grade) => Self {
                tiene_nota: true,
                calificacion: Some(grade.score),
                fecha: Some(grade.graded_at),
                intento: Some(grade.attempt),
                nota_id: Some(grade.id),
                mensaje: None,
            },
            None => Self {
                tiene_nota: false,
                calificacion: None,
                fecha: None,
                intento: None,
                nota_id: None,
                mensaje: Some("El estudiante aún no tiene nota definitiva en este bloque".to_string()),
            },
        }
    }
}

// 考试资格
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct EligibilityResponse {
    pub habilitado: bool,
    pub mensaje: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_habilitante_id: Option<i64>,
}

impl From<Eligibility> for EligibilityResponse {
    fn from(eligibility: Eligibility) -> Self {
        match eligibility {
            Eligibility::Eligible(()) => Self {
                habilitado: true,
                mensaje: "Puede rendir Final Virtual".to_string(),
                virtual_habilitante_id: None,
            },
            Eligibility::Ineligible(reason) => Self {
                habilitado: false,
                mensaje: reason.to_string(),
                virtual_habilitante_id: None,
            },
        }
    }
}

impl From<Eligibility<Grade>> for EligibilityResponse {
    fn from(eligibility: Eligibility<Grade>) -> Self {
        match eligibility {
            Eligibility::Eligible(virtual_grade) => Self {
                habilitado: true,
                mensaje: "El estudiante puede rendir el Final Sincrónico".to_string(),
                virtual_habilitante_id: Some(virtual_grade.id),
            },
            Eligibility::Ineligible(reason) => Self {
                habilitado: false,
                mensaje: reason.to_string(),
                virtual_habilitante_id: None,
            },
        }
    }
}
