use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};

use super::EvaluationService;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, evaluations::responses::RecordGradeResponse,
    grades::requests::RecordGradeRequest,
};
use crate::services::error_response;

/// 确定本次登记的评分时间
fn resolve_graded_at(requested: Option<DateTime<Utc>>, accept_client_dates: bool) -> DateTime<Utc> {
    match requested {
        Some(graded_at) if accept_client_dates => graded_at,
        _ => Utc::now(),
    }
}

pub async fn record_grade(
    service: &EvaluationService,
    grade_data: RecordGradeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let sequencer = service.get_sequencer(request);
    let graded_at = resolve_graded_at(
        grade_data.fecha_calificacion,
        AppConfig::get().evaluation.accept_client_grade_dates,
    );

    match sequencer
        .submit_attempt(
            grade_data.estudiante_id,
            grade_data.examen_id,
            grade_data.calificacion,
            graded_at,
        )
        .await
    {
        Ok(grade) => Ok(HttpResponse::Created().json(ApiResponse::success(
            RecordGradeResponse::from(grade),
            "Nota registrada",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
