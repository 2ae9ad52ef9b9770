use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::blocks::requests::{CreateBlockRequest, CreateModuleRequest};
use crate::services::BlockService;
use crate::utils::SafeIDI64;

// 懒加载的全局 BlockService 实例
static BLOCK_SERVICE: Lazy<BlockService> = Lazy::new(BlockService::new_lazy);

// HTTP处理程序
pub async fn list_blocks(req: HttpRequest) -> ActixResult<HttpResponse> {
    BLOCK_SERVICE.list_blocks(&req).await
}

pub async fn create_block(
    req: HttpRequest,
    block_data: web::Json<CreateBlockRequest>,
) -> ActixResult<HttpResponse> {
    BLOCK_SERVICE.create_block(block_data.into_inner(), &req).await
}

pub async fn get_block(req: HttpRequest, block_id: SafeIDI64) -> ActixResult<HttpResponse> {
    BLOCK_SERVICE.get_block(block_id.0, &req).await
}

pub async fn create_module(
    req: HttpRequest,
    block_id: SafeIDI64,
    module_data: web::Json<CreateModuleRequest>,
) -> ActixResult<HttpResponse> {
    BLOCK_SERVICE
        .create_module(block_id.0, module_data.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_blocks_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/blocks")
            .route("", web::get().to(list_blocks))
            .route("", web::post().to(create_block))
            .route("/{id}", web::get().to(get_block))
            .route("/{id}/modules", web::post().to(create_module)),
    );
}
