use crate::dates;
use chrono_tz::Tz;
use crate::types::scoring::{
    Criterion, Employee, EvaluationRecord, Period, Score, DEFAULT_CATEGORY, DEFAULT_MAX_SCORE,
};
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;

pub const CRITERIA_SHEET: &str = "Kriterler";
pub const EMPLOYEES_SHEET: &str = "Calisanlar";
pub const EVALUATIONS_SHEET: &str = "Degerlendirmeler";

const UTF8_BOM: char = '\u{feff}';

pub(crate) fn parse_criteria<R: Read>(
    reader: R,
    roles: &[String],
) -> Result<Vec<Criterion>, csv::Error> {
    let mut csv_reader = reader_builder().from_reader(reader);
    let mut criteria = Vec::new();

    for record in csv_reader.deserialize::<HashMap<String, String>>() {
        let row = strip_bom_keys(record?);
        let cell = |name: &str| row.get(name).map(|value| value.trim()).unwrap_or("");

        let Some(po) = parse_po(cell("Po")) else {
            tracing::debug!(po = cell("Po"), "criterion row without usable Po skipped");
            continue;
        };
        let category = match cell("Kategori") {
            "" => DEFAULT_CATEGORY.to_string(),
            value => value.to_string(),
        };
        let max_score = match cell("PuanMax") {
            "" => Some(DEFAULT_MAX_SCORE),
            value => parse_number(value),
        };
        let role_marks = roles
            .iter()
            .filter_map(|role| row.get(role).map(|mark| (role.clone(), mark.trim().to_string())))
            .collect::<BTreeMap<_, _>>();

        criteria.push(Criterion {
            po,
            category,
            period: Period::parse(cell("Period")),
            max_score,
            description: cell("Değerlendirme").to_string(),
            role_marks,
        });
    }

    Ok(criteria)
}

pub(crate) fn parse_employees<R: Read>(reader: R) -> Result<Vec<Employee>, csv::Error> {
    let mut csv_reader = reader_builder().from_reader(reader);
    let headers = strip_bom_headers(csv_reader.headers()?.clone());
    csv_reader.set_headers(headers);
    let mut employees = Vec::new();

    for record in csv_reader.deserialize::<EmployeeRow>() {
        let row = record?;
        let Some(sicil) = row.sicil else {
            continue;
        };
        employees.push(Employee {
            sicil,
            name: row.name.unwrap_or_default(),
            department: row.department.unwrap_or_default(),
            title: row.title.unwrap_or_default(),
        });
    }

    Ok(employees)
}

/// Rows missing any of the required cells are dropped, not rejected.
pub(crate) fn parse_evaluations<R: Read>(
    reader: R,
    tz: Tz,
) -> Result<Vec<EvaluationRecord>, csv::Error> {
    let mut csv_reader = reader_builder().from_reader(reader);
    let headers = strip_bom_headers(csv_reader.headers()?.clone());
    csv_reader.set_headers(headers);
    let mut evaluations = Vec::new();
    let mut dropped = 0usize;

    for (line, record) in csv_reader.deserialize::<EvaluationRow>().enumerate() {
        let row = record?;
        match row.into_record(tz) {
            Some(evaluation) => {
                if evaluation.score < 0.0 {
                    tracing::warn!(
                        row = line + 2,
                        sicil = %evaluation.sicil,
                        po = evaluation.po,
                        "negative Puan will count as 0"
                    );
                }
                evaluations.push(evaluation);
            }
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::warn!(
            dropped,
            "evaluation rows with missing Tarih, Sicil, Rol, Po or Puan skipped"
        );
    }
    Ok(evaluations)
}

#[derive(Debug, Deserialize)]
struct EmployeeRow {
    #[serde(rename = "Sicil", default, deserialize_with = "empty_string_as_none")]
    sicil: Option<String>,
    #[serde(rename = "AdSoyad", default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(rename = "Departman", default, deserialize_with = "empty_string_as_none")]
    department: Option<String>,
    #[serde(rename = "Unvan", default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EvaluationRow {
    #[serde(rename = "Tarih", default, deserialize_with = "empty_string_as_none")]
    date: Option<String>,
    #[serde(rename = "Sicil", default, deserialize_with = "empty_string_as_none")]
    sicil: Option<String>,
    #[serde(rename = "Rol", default, deserialize_with = "empty_string_as_none")]
    role: Option<String>,
    #[serde(rename = "Po", default, deserialize_with = "empty_string_as_none")]
    po: Option<String>,
    #[serde(rename = "Puan", default, deserialize_with = "empty_string_as_none")]
    score: Option<String>,
    #[serde(rename = "HaftaYili", default, deserialize_with = "empty_string_as_none")]
    week: Option<String>,
}

impl EvaluationRow {
    fn into_record(self, tz: Tz) -> Option<EvaluationRecord> {
        let date = dates::parse_date(self.date.as_deref()?, tz)?;
        let po = parse_po(self.po.as_deref()?)?;
        let score = parse_number(self.score.as_deref()?)?;
        let week = self
            .week
            .unwrap_or_else(|| dates::iso_week_label(date));

        Some(EvaluationRecord {
            sicil: self.sicil?,
            role: self.role?,
            po,
            score,
            date,
            week,
        })
    }
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.trim(csv::Trim::All).flexible(true);
    builder
}

fn strip_bom_headers(headers: csv::StringRecord) -> csv::StringRecord {
    headers
        .iter()
        .map(|header| header.trim_start_matches(UTF8_BOM))
        .collect()
}

fn strip_bom_keys(row: HashMap<String, String>) -> HashMap<String, String> {
    row.into_iter()
        .map(|(key, value)| (key.trim_start_matches(UTF8_BOM).to_string(), value))
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

/// Accepts `7` as well as spreadsheet exports such as `7.0`.
pub(crate) fn parse_po(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    if let Ok(po) = trimmed.parse::<u32>() {
        return Some(po);
    }
    let number = parse_number(trimmed)?;
    if number.fract() == 0.0 && number >= 0.0 && number <= f64::from(u32::MAX) {
        Some(number as u32)
    } else {
        None
    }
}

pub(crate) fn parse_number(value: &str) -> Option<Score> {
    let normalized = value.trim().replace(',', ".");
    normalized
        .parse::<Score>()
        .ok()
        .filter(|number| number.is_finite())
}
