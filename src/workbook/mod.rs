pub mod record;
pub mod sheets;

use crate::error::{Result, ScorecardError};
use crate::types::config::{DataConfig, ScoringConfig};
use crate::types::scoring::{Criterion, Workbook};
use sheets::{CRITERIA_SHEET, EMPLOYEES_SHEET, EVALUATIONS_SHEET};
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

pub fn sheet_path(root: &Path, sheet: &str) -> PathBuf {
    root.join(format!("{sheet}.csv"))
}

pub fn load_workbook(root: &Path, data: &DataConfig, scoring: &ScoringConfig) -> Result<Workbook> {
    if !root.is_dir() {
        return Err(ScorecardError::PathNotFound(root.display().to_string()));
    }

    let criteria = sheets::parse_criteria(open_sheet(root, CRITERIA_SHEET)?, &scoring.roles)?;
    let evaluations = sheets::parse_evaluations(open_sheet(root, EVALUATIONS_SHEET)?, scoring.timezone)?;
    let employees = match &data.employees_path {
        Some(path) => {
            if !path.is_file() {
                return Err(ScorecardError::PathNotFound(path.display().to_string()));
            }
            tracing::debug!(path = %path.display(), "employees loaded from override path");
            sheets::parse_employees(File::open(path)?)?
        }
        None => sheets::parse_employees(open_sheet(root, EMPLOYEES_SHEET)?)?,
    };

    validate_criteria(&criteria)?;
    tracing::info!(
        workbook = %root.display(),
        criteria = criteria.len(),
        employees = employees.len(),
        evaluations = evaluations.len(),
        "workbook loaded"
    );

    Ok(Workbook {
        criteria,
        employees,
        evaluations,
    })
}

fn open_sheet(root: &Path, sheet: &str) -> Result<File> {
    let path = sheet_path(root, sheet);
    if !path.is_file() {
        return Err(ScorecardError::MissingSheet(sheet.to_string()));
    }
    Ok(File::open(path)?)
}

fn validate_criteria(criteria: &[Criterion]) -> Result<()> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for criterion in criteria {
        if !seen.insert(criterion.po) && !duplicates.contains(&criterion.po) {
            duplicates.push(criterion.po);
        }
    }
    if !duplicates.is_empty() {
        let ids = duplicates
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ScorecardError::Validation(format!(
            "duplicate Po values in {CRITERIA_SHEET}: {ids}"
        )));
    }

    if let Some(criterion) = criteria
        .iter()
        .find(|criterion| !criterion.max_score.is_some_and(|max| max > 0.0))
    {
        return Err(ScorecardError::Validation(format!(
            "PuanMax must be a number > 0 (Po={})",
            criterion.po
        )));
    }

    Ok(())
}
