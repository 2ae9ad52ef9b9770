pub mod create;
pub mod get;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::exams::requests::{CreateExamRequest, ExamListQuery};
use crate::storage::Storage;

pub struct ExamService {
    storage: Option<Arc<dyn Storage>>,
}

impl ExamService {
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

    // 创建考试
    pub async fn create_exam(
        &self,
        exam_data: CreateExamRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_exam(self, exam_data, request).await
    }

    // 考试列表
    pub async fn list_exams(
        &self,
        query: ExamListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_exams(self, query, request).await
    }

    // 根据ID获取考试
    pub async fn get_exam(&self, exam_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_exam(self, exam_id, request).await
    }
}
