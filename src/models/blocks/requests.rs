use serde::Deserialize;
use ts_rs::TS;

// 课程块创建请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "block.ts")]
pub struct CreateBlockRequest {
    pub nombre: String,
    pub orden: Option<i32>,
}

// 模块创建请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "block.ts")]
pub struct CreateModuleRequest {
    pub nombre: String,
    pub orden: Option<i32>,
}
