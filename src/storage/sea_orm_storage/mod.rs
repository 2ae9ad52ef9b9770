//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod blocks;
mod exams;
mod grades;
mod students;

use crate::config::AppConfig;
use crate::errors::{CfpError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 根据全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| CfpError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 内存 SQLite，单连接（测试使用）
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:", 1, 5).await
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| CfpError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(None)
            .connect_with(opt)
            .await
            .map_err(|e| CfpError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(
        url: &str,
        pool_size: u32,
        timeout: u64,
    ) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| CfpError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(CfpError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 学生模块
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(student).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    // 课程结构模块
    async fn create_block(&self, block: CreateBlockRequest) -> Result<Block> {
        self.create_block_impl(block).await
    }

    async fn get_block_by_id(&self, id: i64) -> Result<Option<Block>> {
        self.get_block_by_id_impl(id).await
    }

    async fn list_blocks(&self) -> Result<Vec<Block>> {
        self.list_blocks_impl().await
    }

    async fn create_module(&self, block_id: i64, module: CreateModuleRequest) -> Result<Module> {
        self.create_module_impl(block_id, module).await
    }

    async fn get_module_by_id(&self, id: i64) -> Result<Option<Module>> {
        self.get_module_by_id_impl(id).await
    }

    async fn list_block_modules(&self, block_id: i64) -> Result<Vec<Module>> {
        self.list_block_modules_impl(block_id).await
    }

    // 考试模块
    async fn create_exam(&self, owner: ExamOwner, exam: CreateExamRequest) -> Result<Exam> {
        self.create_exam_impl(owner, exam).await
    }

    async fn get_exam_by_id(&self, id: i64) -> Result<Option<Exam>> {
        self.get_exam_by_id_impl(id).await
    }

    async fn list_exams(&self, query: ExamListQuery) -> Result<Vec<Exam>> {
        self.list_exams_impl(query).await
    }

    // 成绩模块
    async fn get_grade_by_id(&self, id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_id_impl(id).await
    }

    async fn list_grades_with_pagination(&self, query: GradeListQuery) -> Result<GradeListResponse> {
        self.list_grades_with_pagination_impl(query).await
    }

    async fn has_passed_module_exam(
        &self,
        student_id: i64,
        module_id: i64,
        exam_type: ExamType,
    ) -> Result<bool> {
        self.has_passed_module_exam_impl(student_id, module_id, exam_type)
            .await
    }

    async fn latest_block_grade(
        &self,
        student_id: i64,
        block_id: i64,
        exam_type: ExamType,
        passed_only: bool,
    ) -> Result<Option<Grade>> {
        self.latest_block_grade_impl(student_id, block_id, exam_type, passed_only)
            .await
    }

    async fn has_failed_block_grade_after(
        &self,
        student_id: i64,
        block_id: i64,
        exam_type: ExamType,
        after: &Grade,
    ) -> Result<bool> {
        self.has_failed_block_grade_after_impl(student_id, block_id, exam_type, after)
            .await
    }

    async fn definitive_block_grade(&self, student_id: i64, block_id: i64) -> Result<Option<Grade>> {
        self.definitive_block_grade_impl(student_id, block_id).await
    }

    async fn list_block_grade_history(&self, student_id: i64, block_id: i64) -> Result<Vec<Grade>> {
        self.list_block_grade_history_impl(student_id, block_id)
            .await
    }

    async fn record_grade(&self, grade: NewGrade) -> Result<Grade> {
        self.record_grade_impl(grade).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("cfp.db").unwrap(),
            "sqlite://cfp.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/cfp").unwrap(),
            "postgres://u:p@localhost/cfp"
        );
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }
}
