use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::{
    ApiResponse, evaluations::responses::RecordGradeResponse,
    grades::requests::RecordEquivalenceRequest,
};
use crate::services::error_response;

pub async fn record_equivalence(
    service: &EvaluationService,
    equivalence_data: RecordEquivalenceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let sequencer = service.get_sequencer(request);

    match sequencer
        .record_equivalence(
            equivalence_data.estudiante_id,
            equivalence_data.examen_id,
            equivalence_data.calificacion,
            &equivalence_data.origen_equivalencia,
            equivalence_data.fecha_ref_equivalencia,
        )
        .await
    {
        Ok(grade) => Ok(HttpResponse::Created().json(ApiResponse::success(
            RecordGradeResponse::from(grade),
            "Equivalencia registrada",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
