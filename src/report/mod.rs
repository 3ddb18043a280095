pub mod export;
pub mod json;
pub mod md;
pub mod tables;

use crate::error::{Result, ScorecardError};
use crate::types::scoring::ScoreResult;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
    Csv,
}

pub fn render(result: &ScoreResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::to_json(result).map_err(ScorecardError::Json),
        OutputFormat::Md => Ok(md::to_markdown(result)),
        OutputFormat::Csv => tables::to_csv(result),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::scoring::{MissingRow, ScoreRow};
    use chrono::NaiveDate;

    pub(crate) fn sample_result() -> ScoreResult {
        ScoreResult {
            as_of: NaiveDate::from_ymd_opt(2024, 3, 22).expect("valid date"),
            week: "2024-W12".to_string(),
            scores: vec![
                ScoreRow {
                    sicil: "100".to_string(),
                    name: "Ayşe Yılmaz".to_string(),
                    department: "Planlama".to_string(),
                    title: "Uzman".to_string(),
                    total: 80.0,
                    week: "2024-W12".to_string(),
                },
                ScoreRow {
                    sicil: "200".to_string(),
                    name: "Mehmet Kaya".to_string(),
                    department: "Lojistik".to_string(),
                    title: "Şef".to_string(),
                    total: 0.0,
                    week: "2024-W12".to_string(),
                },
            ],
            missing: vec![MissingRow {
                sicil: "200".to_string(),
                name: "Mehmet Kaya".to_string(),
                po: 2,
                description: "Uyum".to_string(),
                period: "Tespit".to_string(),
                missing_roles: "Personel, Şef".to_string(),
            }],
            warnings: vec!["Unknown period 'Aylık' for Po=9".to_string()],
        }
    }

    #[test]
    fn render_dispatches_on_format() {
        let result = sample_result();
        let md = render(&result, OutputFormat::Md).expect("markdown should render");
        assert!(md.starts_with("# Scorecard"));
        let json = render(&result, OutputFormat::Json).expect("json should render");
        assert!(json.trim_start().starts_with('{'));
        let csv = render(&result, OutputFormat::Csv).expect("csv should render");
        assert!(csv.starts_with("Sicil,"));
    }
}
