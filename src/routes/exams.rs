use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::exams::requests::{CreateExamRequest, ExamListQuery};
use crate::services::ExamService;
use crate::utils::SafeIDI64;

// 懒加载的全局 ExamService 实例
static EXAM_SERVICE: Lazy<ExamService> = Lazy::new(ExamService::new_lazy);

// HTTP处理程序
pub async fn list_exams(
    req: HttpRequest,
    query: web::Query<ExamListQuery>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_exams(query.into_inner(), &req).await
}

pub async fn create_exam(
    req: HttpRequest,
    exam_data: web::Json<CreateExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.create_exam(exam_data.into_inner(), &req).await
}

pub async fn get_exam(req: HttpRequest, exam_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.get_exam(exam_id.0, &req).await
}

// 配置路由
pub fn configure_exams_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/exams")
            .route("", web::get().to(list_exams))
            .route("", web::post().to(create_exam))
            .route("/{id}", web::get().to(get_exam)),
    );
}
