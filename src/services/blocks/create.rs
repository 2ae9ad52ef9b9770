use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::BlockService;
use crate::models::{ApiResponse, ErrorCode, blocks::requests::CreateBlockRequest};
use crate::services::error_response;
use crate::utils::validate::validate_name;

pub async fn create_block(
    service: &BlockService,
    mut block_data: CreateBlockRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_name("nombre", &block_data.nombre) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }
    block_data.nombre = block_data.nombre.trim().to_string();

    let storage = service.get_storage(request);

    match storage.create_block(block_data).await {
        Ok(block) => Ok(HttpResponse::Created().json(ApiResponse::success(block, "Bloque creado"))),
        Err(e) => Ok(error_response(&e)),
    }
}
