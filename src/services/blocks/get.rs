use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::BlockService;
use crate::models::{
    ApiResponse, ErrorCode,
    blocks::{entities::BlockStructure, responses::BlockDetailResponse},
};
use crate::services::error_response;

pub async fn get_block(
    service: &BlockService,
    block_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let block = match storage.get_block_by_id(block_id).await {
        Ok(Some(block)) => block,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::BlockNotFound,
                "Bloque no encontrado",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    match storage.list_block_modules(block_id).await {
        Ok(modules) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            BlockDetailResponse::from(BlockStructure { block, modules }),
            "Consulta exitosa",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
