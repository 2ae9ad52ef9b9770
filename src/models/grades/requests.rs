use serde::Deserialize;
use ts_rs::TS;

// 登记考试成绩请求（按考试类型分派）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct RecordGradeRequest {
    pub estudiante_id: i64,
    pub examen_id: i64,
    pub calificacion: f64,
    /// 不填时为当前时间
    pub fecha_calificacion: Option<chrono::DateTime<chrono::Utc>>,
}

// 登记等效认定请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct RecordEquivalenceRequest {
    pub estudiante_id: i64,
    pub examen_id: i64,
    pub calificacion: f64,
    pub origen_equivalencia: String,
    pub fecha_ref_equivalencia: Option<chrono::NaiveDate>,
}

// 成绩列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct GradeListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub examen_id: Option<i64>,
    pub estudiante_id: Option<i64>,
    pub aprobado: Option<bool>,
    pub modulo_id: Option<i64>,
    pub bloque_id: Option<i64>,
}
