use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExamService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn get_exam(
    service: &ExamService,
    exam_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_exam_by_id(exam_id).await {
        Ok(Some(exam)) => Ok(HttpResponse::Ok().json(ApiResponse::success(exam, "Consulta exitosa"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ExamNotFound,
            "Examen no encontrado",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
