//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_cfp_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum CfpError {
            $($variant(String),)*
        }

        impl CfpError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(CfpError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(CfpError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(CfpError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl CfpError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        CfpError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_cfp_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    Validation("E004", "Validation Error"),
    NotFound("E005", "Resource Not Found"),
    InvalidExamType("E006", "Invalid Exam Type"),
    Ineligible("E007", "Not Eligible"),
    Serialization("E008", "Serialization Error"),
    DateParse("E009", "Date Parse Error"),
}

impl CfpError {
    /// 业务规则类错误，可直接展示给调用方，不属于系统故障
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CfpError::Validation(_)
                | CfpError::NotFound(_)
                | CfpError::InvalidExamType(_)
                | CfpError::Ineligible(_)
                | CfpError::DateParse(_)
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for CfpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CfpError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for CfpError {
    fn from(err: sea_orm::DbErr) -> Self {
        CfpError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for CfpError {
    fn from(err: serde_json::Error) -> Self {
        CfpError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for CfpError {
    fn from(err: chrono::ParseError) -> Self {
        CfpError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CfpError>;
