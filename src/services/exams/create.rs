use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ExamService;
use crate::models::{
    ApiResponse, ErrorCode,
    exams::{entities::ExamOwner, requests::CreateExamRequest},
};
use crate::services::error_response;

pub async fn create_exam(
    service: &ExamService,
    exam_data: CreateExamRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 归属二选一，且类型与归属匹配
    let owner = match ExamOwner::from_parents(exam_data.modulo_id, exam_data.bloque_id)
        .and_then(|owner| owner.check_type(exam_data.tipo_examen).map(|_| owner))
    {
        Ok(owner) => owner,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ExamOwnerInvalid,
                e.message(),
            )));
        }
    };

    if exam_data
        .peso
        .is_some_and(|weight| !weight.is_finite() || weight < 0.0)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "El peso debe ser un número no negativo",
        )));
    }

    let storage = service.get_storage(request);

    // 父级必须存在
    let parent_exists = match owner {
        ExamOwner::Module(module_id) => storage
            .get_module_by_id(module_id)
            .await
            .map(|m| m.is_some()),
        ExamOwner::Block(block_id) => storage.get_block_by_id(block_id).await.map(|b| b.is_some()),
    };
    match parent_exists {
        Ok(true) => {}
        Ok(false) => {
            let (code, msg) = match owner {
                ExamOwner::Module(_) => (ErrorCode::ModuleNotFound, "Módulo no encontrado"),
                ExamOwner::Block(_) => (ErrorCode::BlockNotFound, "Bloque no encontrado"),
            };
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(code, msg)));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    match storage.create_exam(owner, exam_data).await {
        Ok(exam) => {
            info!("Created {} exam {} ({:?})", exam.exam_type, exam.id, owner);
            Ok(HttpResponse::Created().json(ApiResponse::success(exam, "Examen creado")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
