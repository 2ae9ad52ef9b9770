use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::BlockService;
use crate::models::{ApiResponse, blocks::responses::BlockListResponse};
use crate::services::error_response;

pub async fn list_blocks(service: &BlockService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_blocks().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            BlockListResponse { items },
            "Consulta exitosa",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
