use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::grades::requests::{RecordEquivalenceRequest, RecordGradeRequest};
use crate::services::EvaluationService;
use crate::utils::StudentBlockPath;

// 懒加载的全局 EvaluationService 实例
static EVALUATION_SERVICE: Lazy<EvaluationService> = Lazy::new(EvaluationService::new_lazy);

// HTTP处理程序
pub async fn record_grade(
    req: HttpRequest,
    grade_data: web::Json<RecordGradeRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .record_grade(grade_data.into_inner(), &req)
        .await
}

pub async fn record_equivalence(
    req: HttpRequest,
    equivalence_data: web::Json<RecordEquivalenceRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .record_equivalence(equivalence_data.into_inner(), &req)
        .await
}

pub async fn get_status(req: HttpRequest, path: StudentBlockPath) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .get_status(path.student_id, path.block_id, &req)
        .await
}

pub async fn get_definitive_grade(
    req: HttpRequest,
    path: StudentBlockPath,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .get_definitive_grade(path.student_id, path.block_id, &req)
        .await
}

pub async fn check_virtual_eligibility(
    req: HttpRequest,
    path: StudentBlockPath,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .check_virtual_eligibility(path.student_id, path.block_id, &req)
        .await
}

pub async fn check_synchronous_eligibility(
    req: HttpRequest,
    path: StudentBlockPath,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .check_synchronous_eligibility(path.student_id, path.block_id, &req)
        .await
}

pub async fn get_history(req: HttpRequest, path: StudentBlockPath) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .get_history(path.student_id, path.block_id, &req)
        .await
}

// 配置路由
pub fn configure_evaluations_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluations")
            .route("/grades", web::post().to(record_grade))
            .route("/equivalences", web::post().to(record_equivalence))
            .service(
                web::scope("/students/{sid}/blocks/{bid}")
                    .route("/status", web::get().to(get_status))
                    .route("/definitive-grade", web::get().to(get_definitive_grade))
                    .route(
                        "/virtual-eligibility",
                        web::get().to(check_virtual_eligibility),
                    )
                    .route(
                        "/synchronous-eligibility",
                        web::get().to(check_synchronous_eligibility),
                    )
                    .route("/history", web::get().to(get_history)),
            ),
    );
}
