use super::entities::StudentStatus;
use serde::Deserialize;
use ts_rs::TS;

// 学生创建请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct CreateStudentRequest {
    pub dni: String,
    pub email: String,
    pub nombre: String,
    pub apellido: String,
    pub estatus: Option<StudentStatus>,
}
