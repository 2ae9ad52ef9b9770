use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::BlockService;
use crate::models::{ApiResponse, ErrorCode, blocks::requests::CreateModuleRequest};
use crate::services::error_response;
use crate::utils::validate::validate_name;

pub async fn create_module(
    service: &BlockService,
    block_id: i64,
    mut module_data: CreateModuleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_name("nombre", &module_data.nombre) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }
    module_data.nombre = module_data.nombre.trim().to_string();

    let storage = service.get_storage(request);

    // 课程块必须存在
    match storage.get_block_by_id(block_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::BlockNotFound,
                "Bloque no encontrado",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    match storage.create_module(block_id, module_data).await {
        Ok(module) => Ok(HttpResponse::Created().json(ApiResponse::success(module, "Módulo creado"))),
        Err(e) => Ok(error_response(&e)),
    }
}
