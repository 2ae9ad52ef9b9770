use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::models::{
    ApiResponse, ErrorCode,
    students::{requests::CreateStudentRequest, responses::StudentResponse},
};
use crate::services::error_response;
use crate::utils::validate::{normalize_dni, validate_dni, validate_email, validate_name};

pub async fn create_student(
    service: &StudentService,
    mut student_data: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 验证 DNI
    if let Err(msg) = validate_dni(&student_data.dni) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::StudentDniInvalid, msg)));
    }

    // 验证邮箱
    if let Err(msg) = validate_email(&student_data.email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::StudentEmailInvalid, msg)));
    }

    // 验证姓名
    for (field, value) in [
        ("nombre", &student_data.nombre),
        ("apellido", &student_data.apellido),
    ] {
        if let Err(msg) = validate_name(field, value) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
        }
    }

    student_data.dni = normalize_dni(&student_data.dni);
    student_data.email = student_data.email.trim().to_lowercase();
    student_data.nombre = student_data.nombre.trim().to_string();
    student_data.apellido = student_data.apellido.trim().to_string();

    let storage = service.get_storage(request);

    match storage.create_student(student_data).await {
        Ok(estudiante) => {
            info!("Created student {} ({})", estudiante.id, estudiante.full_name());
            Ok(HttpResponse::Created().json(ApiResponse::success(
                StudentResponse { estudiante },
                "Estudiante creado",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
