use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程块
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "block.ts")]
pub struct Block {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "orden")]
    pub position: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 模块
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "block.ts")]
pub struct Module {
    pub id: i64,
    #[serde(rename = "bloque_id")]
    pub block_id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "orden")]
    pub position: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 课程块及其按顺序排列的模块
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStructure {
    pub block: Block,
    pub modules: Vec<Module>,
}

impl BlockStructure {
    /// 多于一个模块时，线上期末需要先通过各模块的期中考试
    pub fn requires_partials(&self) -> bool {
        self.modules.len() > 1
    }
}
