use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::ApiResponse;
use crate::models::grades::requests::GradeListQuery;
use crate::services::error_response;

pub async fn list_grades(
    service: &GradeService,
    request: &HttpRequest,
    query: GradeListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_grades_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Consulta exitosa"))),
        Err(e) => Ok(error_response(&e)),
    }
}
