use crate::dates;
use crate::error::{Result, ScorecardError};
use crate::types::scoring::Score;
use crate::workbook::sheets::{self, EVALUATIONS_SHEET};
use crate::workbook::sheet_path;
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const EVALUATION_COLUMNS: [&str; 8] = [
    "Tarih", "Sicil", "Rol", "Po", "Puan", "HaftaYili", "Not", "Period",
];
const REQUIRED_COLUMNS: [&str; 5] = ["Tarih", "Sicil", "Rol", "Po", "Puan"];

#[derive(Debug, Clone, Default)]
pub struct NewEvaluation {
    pub sicil: String,
    pub role: String,
    pub po: i64,
    pub score: Score,
    pub date: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvaluation {
    pub sicil: String,
    pub role: String,
    pub po: u32,
    pub score: Score,
    pub date: NaiveDate,
    pub week: String,
    pub note: Option<String>,
}

impl NewEvaluation {
    pub fn validate(
        self,
        roles: &[String],
        tz: Tz,
        today: NaiveDate,
    ) -> Result<RecordedEvaluation> {
        let mut errors = Vec::new();

        let sicil = self.sicil.trim().to_string();
        if sicil.is_empty() {
            errors.push("Sicil is required.".to_string());
        }

        let role = self.role.trim().to_string();
        if role.is_empty() {
            errors.push("Rol is required.".to_string());
        } else if !roles.iter().any(|known| known == &role) {
            errors.push(format!("Rol must be one of: {}.", roles.join(", ")));
        }

        let po = match u32::try_from(self.po) {
            Ok(po) if po >= 1 => Some(po),
            _ => {
                errors.push("Po must be 1 or greater.".to_string());
                None
            }
        };

        if !self.score.is_finite() || self.score < 0.0 {
            errors.push("Puan must be a number >= 0.".to_string());
        }

        let date = match self.date.as_deref().map(str::trim).filter(|value| !value.is_empty()) {
            Some(raw) => {
                let parsed = dates::parse_date(raw, tz);
                if parsed.is_none() {
                    errors.push(format!(
                        "Tarih '{raw}' must be an ISO date (YYYY-MM-DD or YYYY-MM-DDTHH:MM)."
                    ));
                }
                parsed
            }
            None => Some(today),
        };

        match (po, date) {
            (Some(po), Some(date)) if errors.is_empty() => Ok(RecordedEvaluation {
                sicil,
                role,
                po,
                score: self.score,
                date,
                week: dates::iso_week_label(date),
                note: self
                    .note
                    .map(|note| note.trim().to_string())
                    .filter(|note| !note.is_empty()),
            }),
            _ => Err(ScorecardError::InvalidRecord(errors.join(" "))),
        }
    }
}

/// Appends one evaluation row to the workbook's evaluation sheet, following
/// that sheet's column order. An empty sheet gets the standard header first.
pub fn append_evaluation(root: &Path, evaluation: &RecordedEvaluation) -> Result<PathBuf> {
    let path = sheet_path(root, EVALUATIONS_SHEET);
    if !path.is_file() {
        return Err(ScorecardError::MissingSheet(EVALUATIONS_SHEET.to_string()));
    }

    let existing = fs::read(&path)?;
    let headers = sheet_headers(&existing)?;

    if headers.is_empty() {
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(EVALUATION_COLUMNS)?;
        writer.write_record(EVALUATION_COLUMNS.iter().map(|column| cell_for(column, evaluation)))?;
        writer.flush()?;
    } else {
        let missing = REQUIRED_COLUMNS
            .iter()
            .filter(|column| !headers.iter().any(|header| header == **column))
            .copied()
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(ScorecardError::Validation(format!(
                "{EVALUATIONS_SHEET} header is missing required column(s): {}",
                missing.join(", ")
            )));
        }

        let row = headers
            .iter()
            .map(|header| cell_for(header, evaluation))
            .collect::<Vec<_>>();
        let mut file = OpenOptions::new().append(true).open(&path)?;
        if !existing.ends_with(b"\n") {
            file.write_all(b"\n")?;
        }
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(&row)?;
        writer.flush()?;
    }

    tracing::info!(
        sicil = %evaluation.sicil,
        po = evaluation.po,
        role = %evaluation.role,
        date = %evaluation.date,
        "evaluation recorded"
    );
    Ok(path)
}

fn sheet_headers(content: &[u8]) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content);
    let headers = reader
        .headers()?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').trim().to_string())
        .collect::<Vec<_>>();
    if headers.iter().all(String::is_empty) {
        return Ok(Vec::new());
    }
    Ok(headers)
}

fn cell_for(header: &str, evaluation: &RecordedEvaluation) -> String {
    match header {
        "Tarih" => evaluation.date.format("%Y-%m-%d").to_string(),
        "Sicil" => evaluation.sicil.clone(),
        "Rol" => evaluation.role.clone(),
        "Po" => evaluation.po.to_string(),
        "Puan" => evaluation.score.to_string(),
        "HaftaYili" => evaluation.week.clone(),
        "Not" => evaluation.note.clone().unwrap_or_default(),
        _ => String::new(),
    }
}
