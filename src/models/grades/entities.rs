use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{CfpError, Result};

/// 及格线
pub const PASSING_SCORE: f64 = 6.0;
/// 最高分
pub const MAX_SCORE: f64 = 10.0;

/// 成绩是否及格
pub fn is_passing(score: f64) -> bool {
    score >= PASSING_SCORE
}

/// 校验分数范围（0 ~ 10）
pub fn validate_score(score: f64) -> Result<()> {
    if !score.is_finite() || !(0.0..=MAX_SCORE).contains(&score) {
        return Err(CfpError::validation(format!(
            "La calificación debe estar entre 0 y {MAX_SCORE} (recibido: {score})"
        )));
    }
    Ok(())
}

// 成绩（每次考试尝试一条记录）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct Grade {
    pub id: i64,
    #[serde(rename = "examen_id")]
    pub exam_id: i64,
    #[serde(rename = "estudiante_id")]
    pub student_id: i64,
    #[serde(rename = "calificacion")]
    pub score: f64,
    #[serde(rename = "aprobado")]
    pub passed: bool,
    #[serde(rename = "fecha_calificacion")]
    pub graded_at: DateTime<Utc>,
    #[serde(rename = "intento")]
    pub attempt: i32,
    #[serde(rename = "es_nota_definitiva")]
    pub is_definitive: bool,
    /// 授权本次同步期末的线上期末成绩（仅记录来源）
    #[serde(rename = "habilitado_por_id")]
    pub authorized_by: Option<i64>,
    #[serde(rename = "es_equivalencia")]
    pub is_equivalence: bool,
    #[serde(rename = "origen_equivalencia")]
    pub equivalence_origin: String,
    #[serde(rename = "fecha_ref_equivalencia")]
    pub equivalence_date: Option<NaiveDate>,
}

/// 等效认定信息
#[derive(Debug, Clone, PartialEq)]
pub struct EquivalenceInfo {
    pub origin: String,
    pub reference_date: Option<NaiveDate>,
}

/// 待写入的成绩
///
/// `passed` 与 `graded_at` 在构造时确定，`attempt` 由存储层在事务内分配。
#[derive(Debug, Clone, PartialEq)]
pub struct NewGrade {
    pub exam_id: i64,
    pub student_id: i64,
    pub score: f64,
    pub passed: bool,
    pub graded_at: DateTime<Utc>,
    pub is_definitive: bool,
    pub authorized_by: Option<i64>,
    pub equivalence: Option<EquivalenceInfo>,
}

impl NewGrade {
    /// 创建一次普通考试尝试，评分时间默认为当前时间
    pub fn attempt(exam_id: i64, student_id: i64, score: f64) -> Result<Self> {
        validate_score(score)?;
        Ok(Self {
            exam_id,
            student_id,
            score,
            passed: is_passing(score),
            graded_at: Utc::now(),
            is_definitive: false,
            authorized_by: None,
            equivalence: None,
        })
    }

    pub fn graded_at(mut self, graded_at: DateTime<Utc>) -> Self {
        self.graded_at = graded_at;
        self
    }

    /// 标记为最终成绩（仅在及格时生效）
    pub fn definitive_if_passed(mut self) -> Self {
        self.is_definitive = self.passed;
        self
    }

    pub fn authorized_by(mut self, grade_id: Option<i64>) -> Self {
        self.authorized_by = grade_id;
        self
    }

    pub fn equivalence(mut self, origin: impl Into<String>, reference_date: Option<NaiveDate>) -> Self {
        self.equivalence = Some(EquivalenceInfo {
            origin: origin.into(),
            reference_date,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passing_threshold_is_inclusive() {
        assert!(is_passing(6.0));
        assert!(!is_passing(5.99));
        assert!(is_passing(10.0));
    }

    #[test]
    fn test_validate_score_range() {
        assert!(validate_score(0.0).is_ok());
        assert!(validate_score(10.0).is_ok());
        assert!(validate_score(-1.0).is_err());
        assert!(validate_score(10.5).is_err());
        assert!(validate_score(f64::NAN).is_err());
    }

    #[test]
    fn test_new_grade_derives_passed_from_score() {
        let passed = NewGrade::attempt(1, 2, 7.0).unwrap();
        assert!(passed.passed);
        assert!(!passed.is_definitive);

        let failed = NewGrade::attempt(1, 2, 4.0).unwrap();
        assert!(!failed.passed);
    }

    #[test]
    fn test_definitive_only_when_passed() {
        let passed = NewGrade::attempt(1, 2, 8.0).unwrap().definitive_if_passed();
        assert!(passed.is_definitive);

        let failed = NewGrade::attempt(1, 2, 3.0).unwrap().definitive_if_passed();
        assert!(!failed.is_definitive);
    }

    #[test]
    fn test_explicit_graded_at_is_kept() {
        let at = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        let grade = NewGrade::attempt(1, 2, 6.0).unwrap().graded_at(at);
        assert_eq!(grade.graded_at, at);
    }

    #[test]
    fn test_grade_serializes_with_storage_field_names() {
        let grade = Grade {
            id: 10,
            exam_id: 3,
            student_id: 4,
            score: 7.0,
            passed: true,
            graded_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
            attempt: 2,
            is_definitive: true,
            authorized_by: Some(9),
            is_equivalence: false,
            equivalence_origin: String::new(),
            equivalence_date: None,
        };
        let value = serde_json::to_value(&grade).unwrap();
        assert_eq!(value["calificacion"], 7.0);
        assert_eq!(value["intento"], 2);
        assert_eq!(value["es_nota_definitiva"], true);
        assert_eq!(value["habilitado_por_id"], 9);
    }
}
