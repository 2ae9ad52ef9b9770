use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::{
    ApiResponse,
    evaluations::responses::{DefinitiveGradeResponse, EvaluationStatusResponse},
};
use crate::services::error_response;

pub async fn get_status(
    service: &EvaluationService,
    student_id: i64,
    block_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let sequencer = service.get_sequencer(request);

    match sequencer.evaluation_status(student_id, block_id).await {
        Ok(status) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EvaluationStatusResponse::from(status),
            "Consulta exitosa",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_definitive_grade(
    service: &EvaluationService,
    student_id: i64,
    block_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let sequencer = service.get_sequencer(request);

    match sequencer.definitive_grade_for_block(student_id, block_id).await {
        Ok(grade) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            DefinitiveGradeResponse::from(grade),
            "Consulta exitosa",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
