pub mod blocks;
pub mod evaluations;
pub mod exams;
pub mod grades;
pub mod students;

pub use blocks::BlockService;
pub use evaluations::EvaluationService;
pub use exams::ExamService;
pub use grades::GradeService;
pub use students::StudentService;

use actix_web::HttpResponse;
use tracing::error;

use crate::errors::CfpError;
use crate::models::{ApiResponse, ErrorCode};

/// 是否为唯一约束冲突（SQLite / PostgreSQL / MySQL）
fn is_unique_violation(err: &CfpError) -> bool {
    let msg = err.message();
    msg.contains("UNIQUE constraint failed")
        || msg.contains("duplicate key value")
        || msg.contains("Duplicate entry")
}

/// 将核心错误映射为统一格式的 HTTP 响应，仅 5xx 记录为错误日志
pub(crate) fn error_response(err: &CfpError) -> HttpResponse {
    match err {
        CfpError::Validation(_)
        | CfpError::Ineligible(_)
        | CfpError::InvalidExamType(_)
        | CfpError::DateParse(_) => HttpResponse::BadRequest().json(ApiResponse::from_error(err)),
        CfpError::NotFound(_) => HttpResponse::NotFound().json(ApiResponse::from_error(err)),
        _ if is_unique_violation(err) => HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            "El recurso ya existe",
        )),
        _ => {
            error!("{}", err);
            HttpResponse::InternalServerError().json(ApiResponse::from_error(err))
        }
    }
}
