pub mod create;
pub mod get;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::students::requests::CreateStudentRequest;
use crate::storage::Storage;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 创建学生
    pub async fn create_student(
        &self,
        student_data: CreateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, student_data, request).await
    }

    // 根据ID获取学生
    pub async fn get_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_student(self, student_id, request).await
    }
}
