pub mod get;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::grades::requests::GradeListQuery;
use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
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

    // 成绩列表（分页）
    pub async fn list_grades(
        &self,
        query: GradeListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_grades(self, request, query).await
    }

    // 根据ID获取成绩
    pub async fn get_grade(&self, grade_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_grade(self, grade_id, request).await
    }
}
