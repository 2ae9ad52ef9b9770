use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::grades::requests::GradeListQuery;
use crate::services::GradeService;
use crate::utils::SafeIDI64;

// 懒加载的全局 GradeService 实例
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

// HTTP处理程序
pub async fn list_grades(
    req: HttpRequest,
    query: web::Query<GradeListQuery>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_grades(query.into_inner(), &req).await
}

pub async fn get_grade(req: HttpRequest, grade_id: SafeIDI64) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.get_grade(grade_id.0, &req).await
}

// 配置路由
pub fn configure_grades_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grades")
            .route("", web::get().to(list_grades))
            .route("/{id}", web::get().to(get_grade)),
    );
}
