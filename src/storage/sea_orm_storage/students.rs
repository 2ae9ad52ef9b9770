use super::SeaOrmStorage;
use crate::entity::students::{ActiveModel, Entity as Students};
use crate::errors::{CfpError, Result};
use crate::models::students::{
    entities::{Student, StudentStatus},
    requests::CreateStudentRequest,
};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

impl SeaOrmStorage {
    /// 创建学生
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let now = chrono::Utc::now().timestamp_millis();

        let model = ActiveModel {
            dni: Set(req.dni),
            email: Set(req.email),
            nombre: Set(req.nombre),
            apellido: Set(req.apellido),
            estatus: Set(req.estatus.unwrap_or(StudentStatus::Regular).to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CfpError::database_operation(format!("创建学生失败: {e}")))?;

        Ok(result.into_student())
    }

    /// 通过 ID 获取学生
    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CfpError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }
}
