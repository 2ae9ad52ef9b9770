//! 评估流程引擎集成测试（内存 SQLite）

use std::sync::Arc;

use chrono::{DateTime, Utc};

use rust_cfp_evaluaciones::evaluation::{Eligibility, EvaluationSequencer, IneligibleReason};
use rust_cfp_evaluaciones::models::blocks::entities::{Block, Module};
use rust_cfp_evaluaciones::models::blocks::requests::{CreateBlockRequest, CreateModuleRequest};
use rust_cfp_evaluaciones::models::exams::entities::{Exam, ExamOwner, ExamType};
use rust_cfp_evaluaciones::models::exams::requests::CreateExamRequest;
use rust_cfp_evaluaciones::models::grades::entities::Grade;
use rust_cfp_evaluaciones::models::grades::requests::GradeListQuery;
use rust_cfp_evaluaciones::models::students::entities::Student;
use rust_cfp_evaluaciones::models::students::requests::CreateStudentRequest;
use rust_cfp_evaluaciones::storage::Storage;
use rust_cfp_evaluaciones::storage::sea_orm_storage::SeaOrmStorage;

async fn setup() -> (Arc<dyn Storage>, Arc<EvaluationSequencer>) {
    let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
    let sequencer = Arc::new(EvaluationSequencer::new(storage.clone()));
    (storage, sequencer)
}

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_700_000_000 + secs, 0).unwrap()
}

async fn student(storage: &Arc<dyn Storage>, dni: &str) -> Student {
    storage
        .create_student(CreateStudentRequest {
            dni: dni.to_string(),
            email: format!("{dni}@cfp.edu.ar"),
            nombre: "Ana".to_string(),
            apellido: "Pérez".to_string(),
            estatus: None,
        })
        .await
        .unwrap()
}

async fn block_with_modules(
    storage: &Arc<dyn Storage>,
    name: &str,
    modules: &[&str],
) -> (Block, Vec<Module>) {
    let block = storage
        .create_block(CreateBlockRequest {
            nombre: name.to_string(),
            orden: Some(1),
        })
        .await
        .unwrap();

    let mut created = Vec::new();
    for (i, module) in modules.iter().enumerate() {
        created.push(
            storage
                .create_module(
                    block.id,
                    CreateModuleRequest {
                        nombre: module.to_string(),
                        orden: Some(i as i32 + 1),
                    },
                )
                .await
                .unwrap(),
        );
    }

    (block, created)
}

async fn exam(storage: &Arc<dyn Storage>, owner: ExamOwner, exam_type: ExamType) -> Exam {
    storage
        .create_exam(
            owner,
            CreateExamRequest {
                modulo_id: owner.module_id(),
                bloque_id: owner.block_id(),
                tipo_examen: exam_type,
                fecha: None,
                peso: None,
            },
        )
        .await
        .unwrap()
}

async fn grades_of_exam(storage: &Arc<dyn Storage>, exam_id: i64, student_id: i64) -> Vec<Grade> {
    storage
        .list_grades_with_pagination(GradeListQuery {
            examen_id: Some(exam_id),
            estudiante_id: Some(student_id),
            size: Some(100),
            ..Default::default()
        })
        .await
        .unwrap()
        .items
}

#[tokio::test]
async fn test_single_module_block_needs_no_partials() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111222").await;
    let (block, modules) = block_with_modules(&storage, "B1", &["M1"]).await;
    let partial = exam(&storage, ExamOwner::Module(modules[0].id), ExamType::Parcial).await;

    let eligibility = sequencer
        .eligible_for_final_virtual(s.id, block.id)
        .await
        .unwrap();
    assert!(eligibility.is_eligible());

    // 期中不及格也不影响
    sequencer
        .record_partial_attempt(s.id, partial.id, 2.0)
        .await
        .unwrap();
    let eligibility = sequencer
        .eligible_for_final_virtual(s.id, block.id)
        .await
        .unwrap();
    assert_eq!(eligibility, Eligibility::Eligible(()));
}

#[tokio::test]
async fn test_block_without_modules_is_eligible_for_virtual() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111223").await;
    let (block, _) = block_with_modules(&storage, "B0", &[]).await;

    assert!(
        sequencer
            .eligible_for_final_virtual(s.id, block.id)
            .await
            .unwrap()
            .is_eligible()
    );
}

#[tokio::test]
async fn test_multi_module_block_requires_every_partial() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111224").await;
    let (block, modules) = block_with_modules(&storage, "B1", &["M1", "M2"]).await;
    let p1 = exam(&storage, ExamOwner::Module(modules[0].id), ExamType::Parcial).await;
    let p2 = exam(&storage, ExamOwner::Module(modules[1].id), ExamType::Parcial).await;
    let r2 = exam(&storage, ExamOwner::Module(modules[1].id), ExamType::Recup).await;

    sequencer.record_partial_attempt(s.id, p1.id, 7.0).await.unwrap();

    let eligibility = sequencer
        .eligible_for_final_virtual(s.id, block.id)
        .await
        .unwrap();
    assert_eq!(
        eligibility,
        Eligibility::Ineligible(IneligibleReason::PartialNotPassed {
            block: "B1".to_string(),
            module: "M2".to_string(),
        })
    );
    assert!(eligibility.reason().unwrap().to_string().contains("M2"));

    // 补考及格不计入期中要求
    sequencer.record_partial_attempt(s.id, r2.id, 9.0).await.unwrap();
    assert!(
        !sequencer
            .eligible_for_final_virtual(s.id, block.id)
            .await
            .unwrap()
            .is_eligible()
    );

    // 不及格后再及格
    sequencer.record_partial_attempt(s.id, p2.id, 5.0).await.unwrap();
    sequencer.record_partial_attempt(s.id, p2.id, 6.0).await.unwrap();
    assert!(
        sequencer
            .eligible_for_final_virtual(s.id, block.id)
            .await
            .unwrap()
            .is_eligible()
    );
}

#[tokio::test]
async fn test_partial_attempts_are_numbered_and_never_definitive() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111225").await;
    let (_, modules) = block_with_modules(&storage, "B1", &["M1"]).await;
    let partial = exam(&storage, ExamOwner::Module(modules[0].id), ExamType::Parcial).await;

    let mut attempts = Vec::new();
    for (i, score) in [3.0, 5.5, 9.0].into_iter().enumerate() {
        let grade = sequencer
            .record_partial_attempt_at(s.id, partial.id, score, at(i as i64))
            .await
            .unwrap();
        assert!(!grade.is_definitive);
        attempts.push(grade.attempt);
    }

    assert_eq!(attempts, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_attempt_numbering_is_per_student() {
    let (storage, sequencer) = setup().await;
    let s1 = student(&storage, "30111226").await;
    let s2 = student(&storage, "30111227").await;
    let (_, modules) = block_with_modules(&storage, "B1", &["M1"]).await;
    let partial = exam(&storage, ExamOwner::Module(modules[0].id), ExamType::Parcial).await;

    let g1 = sequencer.record_partial_attempt(s1.id, partial.id, 4.0).await.unwrap();
    let g2 = sequencer.record_partial_attempt(s2.id, partial.id, 8.0).await.unwrap();
    let g3 = sequencer.record_partial_attempt(s1.id, partial.id, 7.0).await.unwrap();

    assert_eq!((g1.attempt, g2.attempt, g3.attempt), (1, 1, 2));
}

#[tokio::test]
async fn test_passing_synchronous_leaves_exactly_one_definitive() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111228").await;
    let (block, _) = block_with_modules(&storage, "B1", &["M1"]).await;
    let virtual_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalVirtual).await;
    let sync_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalSinc).await;

    let v = sequencer
        .record_final_virtual_attempt_at(s.id, virtual_exam.id, 7.0, at(0))
        .await
        .unwrap();
    assert!(!v.is_definitive);

    let first = sequencer
        .record_final_synchronous_attempt_at(s.id, sync_exam.id, 6.0, None, at(10))
        .await
        .unwrap();
    assert!(first.is_definitive);
    assert_eq!(first.authorized_by, Some(v.id));

    let second = sequencer
        .record_final_synchronous_attempt_at(s.id, sync_exam.id, 9.0, None, at(20))
        .await
        .unwrap();
    assert_eq!(second.attempt, 2);

    let definitive: Vec<Grade> = grades_of_exam(&storage, sync_exam.id, s.id)
        .await
        .into_iter()
        .filter(|g| g.is_definitive)
        .collect();
    assert_eq!(definitive.len(), 1);
    assert_eq!(definitive[0].id, second.id);
}

#[tokio::test]
async fn test_failing_synchronous_is_not_definitive() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111229").await;
    let (block, _) = block_with_modules(&storage, "B1", &[]).await;
    let sync_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalSinc).await;

    let failed = sequencer
        .record_final_synchronous_attempt(s.id, sync_exam.id, 4.0, None)
        .await
        .unwrap();
    assert!(!failed.passed);
    assert!(!failed.is_definitive);
    assert_eq!(failed.authorized_by, None);
}

#[tokio::test]
async fn test_failed_synchronous_invalidates_virtual_pass() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111230").await;
    let (block, _) = block_with_modules(&storage, "B1", &["M1"]).await;
    let virtual_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalVirtual).await;
    let sync_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalSinc).await;

    let v = sequencer
        .record_final_virtual_attempt_at(s.id, virtual_exam.id, 7.0, at(0))
        .await
        .unwrap();
    sequencer
        .record_final_synchronous_attempt_at(s.id, sync_exam.id, 3.0, Some(v.id), at(5))
        .await
        .unwrap();

    let eligibility = sequencer
        .eligible_for_final_synchronous(s.id, block.id)
        .await
        .unwrap();
    assert!(matches!(
        eligibility,
        Eligibility::Ineligible(IneligibleReason::VirtualInvalidated { .. })
    ));

    // V 本身仍然是及格的
    let stored = storage.get_grade_by_id(v.id).await.unwrap().unwrap();
    assert!(stored.passed);
}

#[tokio::test]
async fn test_definitive_grade_appears_only_after_synchronous_pass() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111231").await;
    let (block, _) = block_with_modules(&storage, "B1", &["M1"]).await;
    let virtual_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalVirtual).await;
    let sync_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalSinc).await;

    assert_eq!(
        sequencer.definitive_grade_for_block(s.id, block.id).await.unwrap(),
        None
    );

    sequencer
        .record_final_virtual_attempt_at(s.id, virtual_exam.id, 9.0, at(0))
        .await
        .unwrap();
    sequencer
        .record_final_synchronous_attempt_at(s.id, sync_exam.id, 5.0, None, at(1))
        .await
        .unwrap();
    assert_eq!(
        sequencer.definitive_grade_for_block(s.id, block.id).await.unwrap(),
        None
    );

    sequencer
        .record_final_virtual_attempt_at(s.id, virtual_exam.id, 8.0, at(2))
        .await
        .unwrap();
    let passed = sequencer
        .record_final_synchronous_attempt_at(s.id, sync_exam.id, 8.5, None, at(3))
        .await
        .unwrap();

    let definitive = sequencer
        .definitive_grade_for_block(s.id, block.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(definitive.id, passed.id);
    assert_eq!(definitive.score, 8.5);
}

#[tokio::test]
async fn test_virtual_synchronous_reset_cycle() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111232").await;
    let (block, _) = block_with_modules(&storage, "B1", &["M1", "M2"]).await;
    let virtual_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalVirtual).await;
    let sync_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalSinc).await;

    // T1：线上期末及格
    let v1 = sequencer
        .record_final_virtual_attempt_at(s.id, virtual_exam.id, 7.0, at(100))
        .await
        .unwrap();
    assert_eq!(
        sequencer
            .eligible_for_final_synchronous(s.id, block.id)
            .await
            .unwrap(),
        Eligibility::Eligible(v1.clone())
    );

    // T2：同步期末不及格
    sequencer
        .record_final_synchronous_attempt_at(s.id, sync_exam.id, 4.0, None, at(200))
        .await
        .unwrap();
    assert!(
        !sequencer
            .eligible_for_final_synchronous(s.id, block.id)
            .await
            .unwrap()
            .is_eligible()
    );

    // T3：重新通过线上期末
    let v2 = sequencer
        .record_final_virtual_attempt_at(s.id, virtual_exam.id, 8.0, at(300))
        .await
        .unwrap();
    assert_eq!(v2.attempt, 2);
    assert_eq!(
        sequencer
            .eligible_for_final_synchronous(s.id, block.id)
            .await
            .unwrap(),
        Eligibility::Eligible(v2)
    );
}

#[tokio::test]
async fn test_synchronous_eligibility_reasons() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111233").await;
    let (block, _) = block_with_modules(&storage, "B1", &[]).await;
    let virtual_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalVirtual).await;

    assert!(matches!(
        sequencer
            .eligible_for_final_synchronous(s.id, block.id)
            .await
            .unwrap(),
        Eligibility::Ineligible(IneligibleReason::VirtualNotTaken { .. })
    ));

    sequencer
        .record_final_virtual_attempt_at(s.id, virtual_exam.id, 4.5, at(0))
        .await
        .unwrap();
    assert_eq!(
        sequencer
            .eligible_for_final_synchronous(s.id, block.id)
            .await
            .unwrap(),
        Eligibility::Ineligible(IneligibleReason::VirtualNotPassed {
            block: "B1".to_string(),
            score: 4.5,
        })
    );
}

#[tokio::test]
async fn test_wrong_exam_type_is_rejected_without_writing() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111234").await;
    let (block, modules) = block_with_modules(&storage, "B1", &["M1"]).await;
    let partial = exam(&storage, ExamOwner::Module(modules[0].id), ExamType::Parcial).await;
    let virtual_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalVirtual).await;

    let err = sequencer
        .record_final_synchronous_attempt(s.id, partial.id, 8.0, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E006");

    let err = sequencer
        .record_partial_attempt(s.id, virtual_exam.id, 8.0)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E006");

    assert!(
        sequencer
            .attempt_history(s.id, block.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_missing_entities_are_not_found() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111235").await;
    let (block, _) = block_with_modules(&storage, "B1", &[]).await;

    let err = sequencer
        .eligible_for_final_virtual(9999, block.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E005");

    let err = sequencer.evaluation_status(s.id, 9999).await.unwrap_err();
    assert_eq!(err.code(), "E005");

    let err = sequencer
        .record_partial_attempt(s.id, 9999, 7.0)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E005");
}

#[tokio::test]
async fn test_score_out_of_range_is_rejected() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111236").await;
    let (_, modules) = block_with_modules(&storage, "B1", &["M1"]).await;
    let partial = exam(&storage, ExamOwner::Module(modules[0].id), ExamType::Parcial).await;

    let err = sequencer
        .record_partial_attempt(s.id, partial.id, 11.0)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");
    assert!(grades_of_exam(&storage, partial.id, s.id).await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_attempts_get_distinct_numbers() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111237").await;
    let (_, modules) = block_with_modules(&storage, "B1", &["M1"]).await;
    let partial = exam(&storage, ExamOwner::Module(modules[0].id), ExamType::Parcial).await;

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let sequencer = sequencer.clone();
            let (student_id, exam_id) = (s.id, partial.id);
            tokio::spawn(async move {
                sequencer
                    .record_partial_attempt(student_id, exam_id, i as f64)
                    .await
            })
        })
        .collect();

    let mut attempts = Vec::new();
    for handle in handles {
        attempts.push(handle.await.unwrap().unwrap().attempt);
    }
    attempts.sort_unstable();

    assert_eq!(attempts, (1..=8).collect::<Vec<i32>>());
}

#[tokio::test]
async fn test_equivalence_rules() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111238").await;
    let (block, modules) = block_with_modules(&storage, "B1", &["M1"]).await;
    let partial = exam(&storage, ExamOwner::Module(modules[0].id), ExamType::Parcial).await;
    let equivalence_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::Equivalencia).await;

    let err = sequencer
        .record_equivalence(s.id, partial.id, 8.0, "UTN", None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E006");

    let err = sequencer
        .record_equivalence(s.id, equivalence_exam.id, 8.0, "  ", None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");

    let reference = chrono::NaiveDate::from_ymd_opt(2023, 12, 1);
    let grade = sequencer
        .record_equivalence(s.id, equivalence_exam.id, 8.0, "UTN", reference)
        .await
        .unwrap();
    assert!(grade.is_equivalence);
    assert!(grade.is_definitive);
    assert_eq!(grade.equivalence_origin, "UTN");
    assert_eq!(grade.equivalence_date, reference);

    let definitive = sequencer
        .definitive_grade_for_block(s.id, block.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(definitive.id, grade.id);
}

#[tokio::test]
async fn test_equivalence_on_virtual_exam_is_never_definitive() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111239").await;
    let (block, _) = block_with_modules(&storage, "B1", &[]).await;
    let virtual_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalVirtual).await;

    let grade = sequencer
        .record_equivalence(s.id, virtual_exam.id, 9.0, "Otro CFP", None)
        .await
        .unwrap();
    assert!(grade.passed);
    assert!(!grade.is_definitive);

    // 等效认定的线上期末同样可以授权同步期末
    assert!(
        sequencer
            .eligible_for_final_synchronous(s.id, block.id)
            .await
            .unwrap()
            .is_eligible()
    );
}

#[tokio::test]
async fn test_history_covers_block_and_module_exams_in_order() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111240").await;
    let other = student(&storage, "30111241").await;
    let (block, modules) = block_with_modules(&storage, "B1", &["M1", "M2"]).await;
    let (other_block, other_modules) = block_with_modules(&storage, "B2", &["M3"]).await;
    let p1 = exam(&storage, ExamOwner::Module(modules[0].id), ExamType::Parcial).await;
    let p2 = exam(&storage, ExamOwner::Module(modules[1].id), ExamType::Parcial).await;
    let virtual_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalVirtual).await;
    let p3 = exam(&storage, ExamOwner::Module(other_modules[0].id), ExamType::Parcial).await;

    let g_virtual = sequencer
        .record_final_virtual_attempt_at(s.id, virtual_exam.id, 7.0, at(30))
        .await
        .unwrap();
    let g2 = sequencer
        .record_partial_attempt_at(s.id, p2.id, 6.0, at(20))
        .await
        .unwrap();
    let g1 = sequencer
        .record_partial_attempt_at(s.id, p1.id, 8.0, at(10))
        .await
        .unwrap();
    // 其他学生与其他课程块不计入
    sequencer
        .record_partial_attempt_at(other.id, p1.id, 8.0, at(15))
        .await
        .unwrap();
    sequencer
        .record_partial_attempt_at(s.id, p3.id, 8.0, at(16))
        .await
        .unwrap();

    let history = sequencer.attempt_history(s.id, block.id).await.unwrap();
    let ids: Vec<i64> = history.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![g1.id, g2.id, g_virtual.id]);

    // 可重复查询
    assert_eq!(sequencer.attempt_history(s.id, block.id).await.unwrap(), history);
    assert_eq!(
        sequencer
            .attempt_history(s.id, other_block.id)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_evaluation_status_next_step_precedence() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111242").await;
    let (block, modules) = block_with_modules(&storage, "B1", &["M1", "M2"]).await;
    let p1 = exam(&storage, ExamOwner::Module(modules[0].id), ExamType::Parcial).await;
    let p2 = exam(&storage, ExamOwner::Module(modules[1].id), ExamType::Parcial).await;
    let virtual_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalVirtual).await;
    let sync_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalSinc).await;

    // 尚无任何成绩：下一步是线上期末不具备资格的原因
    let status = sequencer.evaluation_status(s.id, block.id).await.unwrap();
    assert!(!status.passed);
    assert!(!status.can_sit_virtual);
    assert!(!status.can_sit_synchronous);
    assert!(status.next_step.contains("M1"));
    assert_eq!(status.virtual_message.as_deref(), Some(status.next_step.as_str()));

    sequencer.record_partial_attempt_at(s.id, p1.id, 7.0, at(0)).await.unwrap();
    sequencer.record_partial_attempt_at(s.id, p2.id, 7.0, at(1)).await.unwrap();
    let status = sequencer.evaluation_status(s.id, block.id).await.unwrap();
    assert!(status.can_sit_virtual);
    assert!(!status.can_sit_synchronous);
    assert_eq!(status.next_step, "Puede rendir Final Virtual");

    sequencer
        .record_final_virtual_attempt_at(s.id, virtual_exam.id, 6.0, at(2))
        .await
        .unwrap();
    let status = sequencer.evaluation_status(s.id, block.id).await.unwrap();
    assert!(status.can_sit_synchronous);
    assert_eq!(status.next_step, "Puede rendir Final Sincrónico");

    sequencer
        .record_final_synchronous_attempt_at(s.id, sync_exam.id, 7.5, None, at(3))
        .await
        .unwrap();
    let status = sequencer.evaluation_status(s.id, block.id).await.unwrap();
    assert!(status.passed);
    assert_eq!(status.final_score(), Some(7.5));
    assert!(!status.can_sit_virtual);
    assert!(!status.can_sit_synchronous);
    assert!(status.next_step.starts_with("Bloque aprobado"));
    assert_eq!(status.history.len(), 4);
}

#[tokio::test]
async fn test_submit_attempt_enforces_eligibility() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111243").await;
    let (block, modules) = block_with_modules(&storage, "B1", &["M1", "M2"]).await;
    let p1 = exam(&storage, ExamOwner::Module(modules[0].id), ExamType::Parcial).await;
    let p2 = exam(&storage, ExamOwner::Module(modules[1].id), ExamType::Parcial).await;
    let virtual_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalVirtual).await;
    let sync_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalSinc).await;
    let equivalence_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::Equivalencia).await;

    // 期中未通过，线上期末被拒绝
    let err = sequencer
        .submit_attempt(s.id, virtual_exam.id, 8.0, at(0))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E007");

    sequencer.submit_attempt(s.id, p1.id, 8.0, at(1)).await.unwrap();
    sequencer.submit_attempt(s.id, p2.id, 8.0, at(2)).await.unwrap();

    // 线上期末之前不能参加同步期末
    let err = sequencer
        .submit_attempt(s.id, sync_exam.id, 8.0, at(3))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E007");

    let v = sequencer
        .submit_attempt(s.id, virtual_exam.id, 8.0, at(4))
        .await
        .unwrap();
    let sync = sequencer
        .submit_attempt(s.id, sync_exam.id, 9.0, at(5))
        .await
        .unwrap();
    assert!(sync.is_definitive);
    assert_eq!(sync.authorized_by, Some(v.id));

    let err = sequencer
        .submit_attempt(s.id, equivalence_exam.id, 9.0, at(6))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E006");
}

#[tokio::test]
async fn test_explicit_authorizing_grade_is_validated() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111244").await;
    let other = student(&storage, "30111245").await;
    let (block, _) = block_with_modules(&storage, "B1", &[]).await;
    let virtual_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalVirtual).await;
    let sync_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalSinc).await;

    let others_virtual = sequencer
        .record_final_virtual_attempt(other.id, virtual_exam.id, 9.0)
        .await
        .unwrap();

    let err = sequencer
        .record_final_synchronous_attempt(s.id, sync_exam.id, 8.0, Some(others_virtual.id))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");

    let err = sequencer
        .record_final_synchronous_attempt(s.id, sync_exam.id, 8.0, Some(424242))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E005");
    assert!(grades_of_exam(&storage, sync_exam.id, s.id).await.is_empty());
}

async fn definitive_in_block(storage: &Arc<dyn Storage>, student_id: i64, block_id: i64) -> Vec<Grade> {
    storage
        .list_grades_with_pagination(GradeListQuery {
            estudiante_id: Some(student_id),
            bloque_id: Some(block_id),
            size: Some(100),
            ..Default::default()
        })
        .await
        .unwrap()
        .items
        .into_iter()
        .filter(|g| g.is_definitive)
        .collect()
}

#[tokio::test]
async fn test_definitive_equivalence_keeps_one_definitive_per_block() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111246").await;
    let (block, _) = block_with_modules(&storage, "B1", &[]).await;
    let virtual_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalVirtual).await;
    let sync_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalSinc).await;
    let equivalence_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::Equivalencia).await;

    sequencer
        .record_final_virtual_attempt_at(s.id, virtual_exam.id, 7.0, at(0))
        .await
        .unwrap();
    let sync = sequencer
        .record_final_synchronous_attempt_at(s.id, sync_exam.id, 8.0, None, at(10))
        .await
        .unwrap();
    assert!(sync.is_definitive);

    // 不及格的等效认定不影响已有最终成绩
    let failed = sequencer
        .record_equivalence(s.id, equivalence_exam.id, 4.0, "UTN", None)
        .await
        .unwrap();
    assert!(!failed.is_definitive);
    assert_eq!(
        definitive_in_block(&storage, s.id, block.id)
            .await
            .iter()
            .map(|g| g.id)
            .collect::<Vec<_>>(),
        vec![sync.id]
    );

    let equivalence = sequencer
        .record_equivalence(s.id, equivalence_exam.id, 9.0, "UTN", None)
        .await
        .unwrap();
    assert!(equivalence.is_definitive);

    let definitive = definitive_in_block(&storage, s.id, block.id).await;
    assert_eq!(definitive.len(), 1);
    assert_eq!(definitive[0].id, equivalence.id);

    let stored_sync = storage.get_grade_by_id(sync.id).await.unwrap().unwrap();
    assert!(!stored_sync.is_definitive);
    assert!(stored_sync.passed);

    assert_eq!(
        sequencer
            .definitive_grade_for_block(s.id, block.id)
            .await
            .unwrap()
            .map(|g| g.id),
        Some(equivalence.id)
    );
}

#[tokio::test]
async fn test_definitive_equivalence_leaves_other_blocks_alone() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111247").await;
    let (b1, _) = block_with_modules(&storage, "B1", &[]).await;
    let (b2, _) = block_with_modules(&storage, "B2", &[]).await;
    let sync_b1 = exam(&storage, ExamOwner::Block(b1.id), ExamType::FinalSinc).await;
    let equivalence_b2 = exam(&storage, ExamOwner::Block(b2.id), ExamType::Equivalencia).await;

    let sync = sequencer
        .record_final_synchronous_attempt_at(s.id, sync_b1.id, 7.0, None, at(0))
        .await
        .unwrap();
    sequencer
        .record_equivalence(s.id, equivalence_b2.id, 8.0, "Otro CFP", None)
        .await
        .unwrap();

    assert!(storage.get_grade_by_id(sync.id).await.unwrap().unwrap().is_definitive);
}

#[tokio::test]
async fn test_backdated_final_submission_is_rejected() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111248").await;
    let (block, _) = block_with_modules(&storage, "B1", &[]).await;
    let virtual_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalVirtual).await;
    let sync_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalSinc).await;

    sequencer
        .submit_attempt(s.id, virtual_exam.id, 7.0, at(100))
        .await
        .unwrap();

    let err = sequencer
        .submit_attempt(s.id, sync_exam.id, 4.0, at(50))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");
    assert!(grades_of_exam(&storage, sync_exam.id, s.id).await.is_empty());

    // 线上期末同样不能补登到更早的时间
    let err = sequencer
        .submit_attempt(s.id, virtual_exam.id, 9.0, at(99))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");

    assert!(
        sequencer
            .eligible_for_final_synchronous(s.id, block.id)
            .await
            .unwrap()
            .is_eligible()
    );
}

#[tokio::test]
async fn test_failed_synchronous_at_same_instant_still_invalidates() {
    let (storage, sequencer) = setup().await;
    let s = student(&storage, "30111249").await;
    let (block, _) = block_with_modules(&storage, "B1", &[]).await;
    let virtual_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalVirtual).await;
    let sync_exam = exam(&storage, ExamOwner::Block(block.id), ExamType::FinalSinc).await;

    sequencer
        .submit_attempt(s.id, virtual_exam.id, 7.0, at(100))
        .await
        .unwrap();
    let failed = sequencer
        .submit_attempt(s.id, sync_exam.id, 4.0, at(100))
        .await
        .unwrap();
    assert!(!failed.passed);

    assert!(matches!(
        sequencer
            .eligible_for_final_synchronous(s.id, block.id)
            .await
            .unwrap(),
        Eligibility::Ineligible(IneligibleReason::VirtualInvalidated { .. })
    ));
}
