use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建学生表
        manager
            .create_table(
                Table::create()
                    .table(Estudiantes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Estudiantes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Estudiantes::Dni)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Estudiantes::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Estudiantes::Nombre).string().not_null())
                    .col(ColumnDef::new(Estudiantes::Apellido).string().not_null())
                    .col(ColumnDef::new(Estudiantes::Estatus).string().not_null())
                    .col(
                        ColumnDef::new(Estudiantes::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Estudiantes::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建课程块表
        manager
            .create_table(
                Table::create()
                    .table(Bloques::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bloques::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bloques::Nombre).string().not_null())
                    .col(
                        ColumnDef::new(Bloques::Orden)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Bloques::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Bloques::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建模块表
        manager
            .create_table(
                Table::create()
                    .table(Modulos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Modulos::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Modulos::BloqueId).big_integer().not_null())
                    .col(ColumnDef::new(Modulos::Nombre).string().not_null())
                    .col(
                        ColumnDef::new(Modulos::Orden)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Modulos::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Modulos::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Modulos::Table, Modulos::BloqueId)
                            .to(Bloques::Table, Bloques::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建考试表（modulo_id 与 bloque_id 二选一）
        manager
            .create_table(
                Table::create()
                    .table(Examenes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Examenes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Examenes::ModuloId).big_integer().null())
                    .col(ColumnDef::new(Examenes::BloqueId).big_integer().null())
                    .col(ColumnDef::new(Examenes::TipoExamen).string().not_null())
                    .col(ColumnDef::new(Examenes::Fecha).string().null())
                    .col(
                        ColumnDef::new(Examenes::Peso)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Examenes::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Examenes::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Examenes::Table, Examenes::ModuloId)
                            .to(Modulos::Table, Modulos::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Examenes::Table, Examenes::BloqueId)
                            .to(Bloques::Table, Bloques::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建成绩表
        manager
            .create_table(
                Table::create()
                    .table(Notas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notas::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notas::ExamenId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Notas::EstudianteId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notas::Calificacion).double().not_null())
                    .col(
                        ColumnDef::new(Notas::Aprobado)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notas::FechaCalificacion)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notas::Intento).integer().not_null())
                    .col(
                        ColumnDef::new(Notas::EsNotaDefinitiva)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Notas::HabilitadoPorId).big_integer().null())
                    .col(
                        ColumnDef::new(Notas::EsEquivalencia)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notas::OrigenEquivalencia)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Notas::FechaRefEquivalencia).string().null())
                    .col(ColumnDef::new(Notas::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Notas::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Notas::Table, Notas::ExamenId)
                            .to(Examenes::Table, Examenes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Notas::Table, Notas::EstudianteId)
                            .to(Estudiantes::Table, Estudiantes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    // 只记录来源，被引用的成绩删除时置空
                    .foreign_key(
                        ForeignKey::create()
                            .from(Notas::Table, Notas::HabilitadoPorId)
                            .to(Notas::Table, Notas::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_estudiantes_apellido_nombre")
                    .table(Estudiantes::Table)
                    .col(Estudiantes::Apellido)
                    .col(Estudiantes::Nombre)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_modulos_bloque_id")
                    .table(Modulos::Table)
                    .col(Modulos::BloqueId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_examenes_modulo_tipo")
                    .table(Examenes::Table)
                    .col(Examenes::ModuloId)
                    .col(Examenes::TipoExamen)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_examenes_bloque_tipo")
                    .table(Examenes::Table)
                    .col(Examenes::BloqueId)
                    .col(Examenes::TipoExamen)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notas_examen_estudiante")
                    .table(Notas::Table)
                    .col(Notas::ExamenId)
                    .col(Notas::EstudianteId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notas_estudiante_fecha")
                    .table(Notas::Table)
                    .col(Notas::EstudianteId)
                    .col(Notas::FechaCalificacion)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Notas::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Examenes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Modulos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bloques::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Estudiantes::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Estudiantes {
    #[sea_orm(iden = "estudiantes")]
    Table,
    Id,
    Dni,
    Email,
    Nombre,
    Apellido,
    Estatus,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Bloques {
    #[sea_orm(iden = "bloques")]
    Table,
    Id,
    Nombre,
    Orden,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Modulos {
    #[sea_orm(iden = "modulos")]
    Table,
    Id,
    BloqueId,
    Nombre,
    Orden,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Examenes {
    #[sea_orm(iden = "examenes")]
    Table,
    Id,
    ModuloId,
    BloqueId,
    TipoExamen,
    Fecha,
    Peso,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notas {
    #[sea_orm(iden = "notas")]
    Table,
    Id,
    ExamenId,
    EstudianteId,
    Calificacion,
    Aprobado,
    FechaCalificacion,
    Intento,
    EsNotaDefinitiva,
    HabilitadoPorId,
    EsEquivalencia,
    OrigenEquivalencia,
    FechaRefEquivalencia,
    CreatedAt,
    UpdatedAt,
}
