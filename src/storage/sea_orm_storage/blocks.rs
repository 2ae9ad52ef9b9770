//! 课程块与模块存储操作

use super::SeaOrmStorage;
use crate::entity::blocks::{ActiveModel as BlockActiveModel, Column as BlockColumn, Entity as Blocks};
use crate::entity::modules::{
    ActiveModel as ModuleActiveModel, Column as ModuleColumn, Entity as Modules,
};
use crate::errors::{CfpError, Result};
use crate::models::blocks::{
    entities::{Block, Module},
    requests::{CreateBlockRequest, CreateModuleRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建课程块
    pub async fn create_block_impl(&self, req: CreateBlockRequest) -> Result<Block> {
        let now = chrono::Utc::now().timestamp_millis();

        let model = BlockActiveModel {
            nombre: Set(req.nombre),
            orden: Set(req.orden.unwrap_or(1)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CfpError::database_operation(format!("创建课程块失败: {e}")))?;

        Ok(result.into_block())
    }

    /// 通过 ID 获取课程块
    pub async fn get_block_by_id_impl(&self, id: i64) -> Result<Option<Block>> {
        let result = Blocks::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CfpError::database_operation(format!("查询课程块失败: {e}")))?;

        Ok(result.map(|m| m.into_block()))
    }

    /// 列出全部课程块
    pub async fn list_blocks_impl(&self) -> Result<Vec<Block>> {
        let blocks = Blocks::find()
            .order_by_asc(BlockColumn::Orden)
            .order_by_asc(BlockColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| CfpError::database_operation(format!("查询课程块列表失败: {e}")))?;

        Ok(blocks.into_iter().map(|m| m.into_block()).collect())
    }

    /// 在课程块下创建模块
    pub async fn create_module_impl(
        &self,
        block_id: i64,
        req: CreateModuleRequest,
    ) -> Result<Module> {
        let now = chrono::Utc::now().timestamp_millis();

        let model = ModuleActiveModel {
            bloque_id: Set(block_id),
            nombre: Set(req.nombre),
            orden: Set(req.orden.unwrap_or(1)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CfpError::database_operation(format!("创建模块失败: {e}")))?;

        Ok(result.into_module())
    }

    /// 通过 ID 获取模块
    pub async fn get_module_by_id_impl(&self, id: i64) -> Result<Option<Module>> {
        let result = Modules::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CfpError::database_operation(format!("查询模块失败: {e}")))?;

        Ok(result.map(|m| m.into_module()))
    }

    /// 课程块的模块，按 (orden, id) 排序
    pub async fn list_block_modules_impl(&self, block_id: i64) -> Result<Vec<Module>> {
        let modules = Modules::find()
            .filter(ModuleColumn::BloqueId.eq(block_id))
            .order_by_asc(ModuleColumn::Orden)
            .order_by_asc(ModuleColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| CfpError::database_operation(format!("查询模块列表失败: {e}")))?;

        Ok(modules.into_iter().map(|m| m.into_module()).collect())
    }
}
