use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::ApiResponse;
use crate::services::error_response;

pub async fn get_history(
    service: &EvaluationService,
    student_id: i64,
    block_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let sequencer = service.get_sequencer(request);

    match sequencer.attempt_history(student_id, block_id).await {
        Ok(history) => Ok(HttpResponse::Ok().json(ApiResponse::success(history, "Consulta exitosa"))),
        Err(e) => Ok(error_response(&e)),
    }
}
