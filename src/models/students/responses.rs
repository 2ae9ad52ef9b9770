use super::entities::Student;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentResponse {
    pub estudiante: Student,
}
