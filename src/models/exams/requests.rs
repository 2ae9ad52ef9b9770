use super::entities::ExamType;
use serde::Deserialize;
use ts_rs::TS;

// 考试创建请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct CreateExamRequest {
    pub modulo_id: Option<i64>,
    pub bloque_id: Option<i64>,
    pub tipo_examen: ExamType,
    pub fecha: Option<chrono::NaiveDate>,
    pub peso: Option<f64>,
}

// 考试列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct ExamListQuery {
    pub modulo_id: Option<i64>,
    pub bloque_id: Option<i64>,
    pub tipo_examen: Option<ExamType>,
}
