pub mod eligibility;
pub mod equivalence;
pub mod history;
pub mod record;
pub mod status;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::evaluation::EvaluationSequencer;
use crate::models::grades::requests::{RecordEquivalenceRequest, RecordGradeRequest};

pub struct EvaluationService {
    sequencer: Option<Arc<EvaluationSequencer>>,
}

impl EvaluationService {
    pub fn new_lazy() -> Self {
        Self { sequencer: None }
    }

    pub(crate) fn get_sequencer(&self, request: &HttpRequest) -> Arc<EvaluationSequencer> {
        if let Some(sequencer) = &self.sequencer {
            sequencer.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<EvaluationSequencer>>>()
                .expect("EvaluationSequencer not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 登记考试成绩（按考试类型分派）
    pub async fn record_grade(
        &self,
        grade_data: RecordGradeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        record::record_grade(self, grade_data, request).await
    }

    // 登记等效认定
    pub async fn record_equivalence(
        &self,
        equivalence_data: RecordEquivalenceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        equivalence::record_equivalence(self, equivalence_data, request).await
    }

    // 课程块评估状态
    pub async fn get_status(
        &self,
        student_id: i64,
        block_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        status::get_status(self, student_id, block_id, request).await
    }

    // 课程块最终成绩
    pub async fn get_definitive_grade(
        &self,
        student_id: i64,
        block_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        status::get_definitive_grade(self, student_id, block_id, request).await
    }

    // 线上期末资格
    pub async fn check_virtual_eligibility(
        &self,
        student_id: i64,
        block_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        eligibility::check_virtual_eligibility(self, student_id, block_id, request).await
    }

    // 同步期末资格
    pub async fn check_synchronous_eligibility(
        &self,
        student_id: i64,
        block_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        eligibility::check_synchronous_eligibility(self, student_id, block_id, request).await
    }

    // 尝试历史
    pub async fn get_history(
        &self,
        student_id: i64,
        block_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        history::get_history(self, student_id, block_id, request).await
    }
}
