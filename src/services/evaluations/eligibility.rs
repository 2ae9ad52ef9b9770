use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::{ApiResponse, evaluations::responses::EligibilityResponse};
use crate::services::error_response;

pub async fn check_virtual_eligibility(
    service: &EvaluationService,
    student_id: i64,
    block_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let sequencer = service.get_sequencer(request);

    match sequencer
        .eligible_for_final_virtual(student_id, block_id)
        .await
    {
        Ok(eligibility) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EligibilityResponse::from(eligibility),
            "Consulta exitosa",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn check_synchronous_eligibility(
    service: &EvaluationService,
    student_id: i64,
    block_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let sequencer = service.get_sequencer(request);

    match sequencer
        .eligible_for_final_synchronous(student_id, block_id)
        .await
    {
        Ok(eligibility) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EligibilityResponse::from(eligibility),
            "Consulta exitosa",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
