use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::CfpError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    /// 由核心错误构造错误响应
    pub fn from_error(err: &CfpError) -> Self {
        Self::error_empty(ErrorCode::from_error(err), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let resp = ApiResponse::success(42i64, "ok");
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["code"], 0);
        assert_eq!(value["data"], 42);
        assert_eq!(value["message"], "ok");
    }

    #[test]
    fn test_error_envelope_omits_data() {
        let resp = ApiResponse::from_error(&CfpError::ineligible("Debe rendir primero el Final Virtual"));
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["code"], ErrorCode::NotEligible as i32);
        assert!(value.get("data").is_none());
        assert_eq!(value["message"], "Debe rendir primero el Final Virtual");
    }
}
