use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学生在读状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "student.ts")]
pub enum StudentStatus {
    Regular, // 正常在读
    Libre,   // 自由生
    Baja,    // 退学
}

impl<'de> Deserialize<'de> for StudentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<StudentStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "Estatus inválido: '{s}'. Valores admitidos: Regular, Libre, Baja"
            ))
        })
    }
}

impl std::fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudentStatus::Regular => write!(f, "Regular"),
            StudentStatus::Libre => write!(f, "Libre"),
            StudentStatus::Baja => write!(f, "Baja"),
        }
    }
}

impl std::str::FromStr for StudentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Regular" => Ok(StudentStatus::Regular),
            "Libre" => Ok(StudentStatus::Libre),
            "Baja" => Ok(StudentStatus::Baja),
            _ => Err(format!("Invalid student status: {s}")),
        }
    }
}

// 学生
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "student.ts")]
pub struct Student {
    pub id: i64,
    pub dni: String,
    pub email: String,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    #[serde(rename = "estatus")]
    pub status: StudentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}
