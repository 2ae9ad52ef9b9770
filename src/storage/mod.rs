use std::sync::Arc;

use crate::models::{
    blocks::{
        entities::{Block, Module},
        requests::{CreateBlockRequest, CreateModuleRequest},
    },
    exams::{
        entities::{Exam, ExamOwner, ExamType},
        requests::{CreateExamRequest, ExamListQuery},
    },
    grades::{
        entities::{Grade, NewGrade},
        requests::GradeListQuery,
        responses::GradeListResponse,
    },
    students::{entities::Student, requests::CreateStudentRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 学生管理方法
    // 创建学生
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student>;
    // 通过ID获取学生信息
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;

    /// 课程结构管理方法
    // 创建课程块
    async fn create_block(&self, block: CreateBlockRequest) -> Result<Block>;
    // 通过ID获取课程块
    async fn get_block_by_id(&self, id: i64) -> Result<Option<Block>>;
    // 列出课程块
    async fn list_blocks(&self) -> Result<Vec<Block>>;
    // 在课程块下创建模块
    async fn create_module(&self, block_id: i64, module: CreateModuleRequest) -> Result<Module>;
    // 通过ID获取模块
    async fn get_module_by_id(&self, id: i64) -> Result<Option<Module>>;
    // 按 (orden, id) 顺序列出课程块的模块
    async fn list_block_modules(&self, block_id: i64) -> Result<Vec<Module>>;

    /// 考试管理方法
    // 创建考试（归属已校验）
    async fn create_exam(&self, owner: ExamOwner, exam: CreateExamRequest) -> Result<Exam>;
    // 通过ID获取考试
    async fn get_exam_by_id(&self, id: i64) -> Result<Option<Exam>>;
    // 列出考试
    async fn list_exams(&self, query: ExamListQuery) -> Result<Vec<Exam>>;

    /// 成绩查询方法
    // 通过ID获取成绩
    async fn get_grade_by_id(&self, id: i64) -> Result<Option<Grade>>;
    // 分页列出成绩
    async fn list_grades_with_pagination(&self, query: GradeListQuery) -> Result<GradeListResponse>;
    // 学生是否通过了模块的某类考试
    async fn has_passed_module_exam(
        &self,
        student_id: i64,
        module_id: i64,
        exam_type: ExamType,
    ) -> Result<bool>;
    // 学生在课程块某类考试上的最新成绩（按评分时间）
    async fn latest_block_grade(
        &self,
        student_id: i64,
        block_id: i64,
        exam_type: ExamType,
        passed_only: bool,
    ) -> Result<Option<Grade>>;
    // 排在给定成绩之后是否存在课程块某类考试的不及格成绩
    async fn has_failed_block_grade_after(
        &self,
        student_id: i64,
        block_id: i64,
        exam_type: ExamType,
        after: &Grade,
    ) -> Result<bool>;
    // 课程块的最终成绩
    async fn definitive_block_grade(&self, student_id: i64, block_id: i64) -> Result<Option<Grade>>;
    // 课程块（含其模块）的全部成绩，按评分时间升序
    async fn list_block_grade_history(&self, student_id: i64, block_id: i64) -> Result<Vec<Grade>>;

    /// 成绩写入方法
    // 在单个事务内分配尝试序号、写入成绩，并在需要时降级同一考试的旧最终成绩
    async fn record_grade(&self, grade: NewGrade) -> Result<Grade>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
