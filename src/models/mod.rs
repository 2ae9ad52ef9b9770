pub mod blocks;
pub mod common;
pub mod evaluations;
pub mod exams;
pub mod grades;
pub mod students;

pub use common::pagination::PaginationInfo;
pub use common::response::ApiResponse;

// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1004,
    Conflict = 1009,
    InternalServerError = 1500,

    // 学生
    StudentNotFound = 2000,
    StudentDniInvalid = 2002,
    StudentEmailInvalid = 2003,

    // 课程结构
    BlockNotFound = 3000,
    ModuleNotFound = 3001,
    ExamNotFound = 3002,
    ExamOwnerInvalid = 3003,

    // 成绩与评估
    GradeNotFound = 4000,
    InvalidExamType = 4002,
    NotEligible = 4003,
}

impl ErrorCode {
    /// 由核心错误推导业务错误码
    pub fn from_error(err: &crate::errors::CfpError) -> Self {
        use crate::errors::CfpError;

        match err {
            CfpError::Validation(_) | CfpError::DateParse(_) => ErrorCode::ValidationFailed,
            CfpError::NotFound(_) => ErrorCode::NotFound,
            CfpError::InvalidExamType(_) => ErrorCode::InvalidExamType,
            CfpError::Ineligible(_) => ErrorCode::NotEligible,
            _ => ErrorCode::InternalServerError,
        }
    }
}
