use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub type Score = f64;

pub const DEFAULT_CATEGORY: &str = "İş";
pub const DEFAULT_MAX_SCORE: Score = 5.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    Weekly,
    Detection,
    Other(String),
}

impl Period {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "" | "haftalık" | "haftalik" | "weekly" => Self::Weekly,
            "tespit" | "detection" => Self::Detection,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Weekly => "Haftalık",
            Self::Detection => "Tespit",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub struct Criterion {
    pub po: u32,
    pub category: String,
    pub period: Period,
    pub max_score: Option<Score>,
    pub description: String,
    pub role_marks: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Employee {
    pub sicil: String,
    pub name: String,
    pub department: String,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct EvaluationRecord {
    pub sicil: String,
    pub role: String,
    pub po: u32,
    pub score: Score,
    pub date: NaiveDate,
    pub week: String,
}

#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub criteria: Vec<Criterion>,
    pub employees: Vec<Employee>,
    pub evaluations: Vec<EvaluationRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    #[serde(rename = "Sicil")]
    pub sicil: String,
    #[serde(rename = "AdSoyad")]
    pub name: String,
    #[serde(rename = "Departman")]
    pub department: String,
    #[serde(rename = "Unvan")]
    pub title: String,
    #[serde(rename = "ToplamSkor")]
    pub total: Score,
    #[serde(rename = "Hafta")]
    pub week: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingRow {
    #[serde(rename = "Sicil")]
    pub sicil: String,
    #[serde(rename = "AdSoyad")]
    pub name: String,
    #[serde(rename = "Po")]
    pub po: u32,
    #[serde(rename = "Değerlendirme")]
    pub description: String,
    #[serde(rename = "Period")]
    pub period: String,
    #[serde(rename = "Eksik_Roller")]
    pub missing_roles: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub as_of: NaiveDate,
    pub week: String,
    pub scores: Vec<ScoreRow>,
    pub missing: Vec<MissingRow>,
    pub warnings: Vec<String>,
}
