use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode, students::responses::StudentResponse};
use crate::services::error_response;

pub async fn get_student(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_student_by_id(student_id).await {
        Ok(Some(estudiante)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentResponse { estudiante },
            "Consulta exitosa",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Estudiante no encontrado",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
