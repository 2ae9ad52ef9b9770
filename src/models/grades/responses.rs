use super::entities::Grade;
use crate::models::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct GradeListResponse {
    pub items: Vec<Grade>,
    pub pagination: PaginationInfo,
}
