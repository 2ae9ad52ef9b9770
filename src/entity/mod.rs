//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod blocks;
pub mod exams;
pub mod grades;
pub mod modules;
pub mod students;

/// 毫秒时间戳转换为 UTC 时间
pub(crate) fn from_millis(ts: i64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(ts).unwrap_or_default()
}
