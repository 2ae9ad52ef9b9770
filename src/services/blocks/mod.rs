pub mod create;
pub mod get;
pub mod list;
pub mod modules;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::blocks::requests::{CreateBlockRequest, CreateModuleRequest};
use crate::storage::Storage;

pub struct BlockService {
    storage: Option<Arc<dyn Storage>>,
}

impl BlockService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 创建课程块
    pub async fn create_block(
        &self,
        block_data: CreateBlockRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_block(self, block_data, request).await
    }

    // 课程块列表
    pub async fn list_blocks(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_blocks(self, request).await
    }

    // 课程块详情（含模块）
    pub async fn get_block(&self, block_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_block(self, block_id, request).await
    }

    // 在课程块下创建模块
    pub async fn create_module(
        &self,
        block_id: i64,
        module_data: CreateModuleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        modules::create_module(self, block_id, module_data, request).await
    }
}
