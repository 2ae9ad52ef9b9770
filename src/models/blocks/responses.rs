use super::entities::{Block, BlockStructure, Module};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "block.ts")]
pub struct BlockListResponse {
    pub items: Vec<Block>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "block.ts")]
pub struct BlockDetailResponse {
    pub bloque: Block,
    pub modulos: Vec<Module>,
}

impl From<BlockStructure> for BlockDetailResponse {
    fn from(structure: BlockStructure) -> Self {
        Self {
            bloque: structure.block,
            modulos: structure.modules,
        }
    }
}
