use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExamService;
use crate::models::{
    ApiResponse,
    exams::{requests::ExamListQuery, responses::ExamListResponse},
};
use crate::services::error_response;

pub async fn list_exams(
    service: &ExamService,
    query: ExamListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_exams(query).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ExamListResponse { items },
            "Consulta exitosa",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
