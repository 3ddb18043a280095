pub mod aggregate;
pub mod criteria;
pub mod missing;
pub mod selector;
pub mod weights;

use crate::dates;
use crate::error::{Result, ScorecardError};
use crate::types::config::ScoringConfig;
use crate::types::scoring::{EvaluationRecord, Period, ScoreResult, ScoreRow, Workbook};
use chrono::NaiveDate;
use chrono_tz::Tz;
use criteria::CriteriaIndex;
use missing::MissingReport;
use selector::Selector;
use std::collections::BTreeSet;
use weights::WeightPolicy;

/// Computes the scorecard for `as_of`.
///
/// Fails before doing any work when the date is not a calendar date or the
/// workbook has no usable criteria. Everything else degrades into warnings
/// and missing rows.
pub fn summarize(workbook: &Workbook, config: &ScoringConfig, as_of: &str) -> Result<ScoreResult> {
    let as_of = parse_as_of(as_of, config.timezone)?;
    let index = CriteriaIndex::build(&workbook.criteria, &config.roles)?;

    let mut warnings = Vec::new();
    let evaluations = screen_evaluations(&workbook.evaluations, &index, &mut warnings);
    let selector = Selector::new(evaluations, as_of, config.detection_window_days);
    let weights = WeightPolicy::from_config(config);

    let mut missing = MissingReport::new();
    let mut scores = Vec::with_capacity(workbook.employees.len());
    for employee in &workbook.employees {
        let total = aggregate::score_employee(
            employee,
            &index,
            &selector,
            &weights,
            &mut missing,
            &mut warnings,
        );
        scores.push(ScoreRow {
            sicil: employee.sicil.clone(),
            name: employee.name.clone(),
            department: employee.department.clone(),
            title: employee.title.clone(),
            total,
            week: selector.week().to_string(),
        });
    }

    let missing = missing.finish(config.effective_missing_threshold());
    tracing::debug!(
        employees = scores.len(),
        criteria = index.len(),
        missing = missing.len(),
        warnings = warnings.len(),
        "scorecard computed"
    );

    Ok(ScoreResult {
        as_of,
        week: selector.week().to_string(),
        scores,
        missing,
        warnings,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckSummary {
    pub criteria: usize,
    pub scorable: usize,
    pub employees: usize,
    pub evaluations: usize,
    pub findings: Vec<String>,
}

pub fn check(workbook: &Workbook, config: &ScoringConfig) -> Result<CheckSummary> {
    let index = CriteriaIndex::build(&workbook.criteria, &config.roles)?;
    let mut findings = Vec::new();

    for entry in index.iter() {
        let po = entry.criterion.po;
        if entry.roles.is_empty() {
            findings.push(format!("Po={po} has no eligible role marked with 'x'"));
        }
        if let Period::Other(raw) = &entry.criterion.period {
            findings.push(format!("Unknown period '{raw}' for Po={po}"));
        }
    }

    let unknown = workbook
        .evaluations
        .iter()
        .filter(|record| !index.contains(record.po))
        .map(|record| record.po)
        .collect::<BTreeSet<_>>();
    if !unknown.is_empty() {
        let ids = unknown
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        findings.push(format!("Evaluations reference unknown Po [{ids}]"));
    }

    Ok(CheckSummary {
        criteria: index.len(),
        scorable: index.scorable().count(),
        employees: workbook.employees.len(),
        evaluations: workbook.evaluations.len(),
        findings,
    })
}

pub fn parse_as_of(value: &str, tz: Tz) -> Result<NaiveDate> {
    dates::parse_date(value, tz).ok_or_else(|| ScorecardError::InvalidAsOfDate(value.to_string()))
}

fn screen_evaluations<'a>(
    evaluations: &'a [EvaluationRecord],
    index: &CriteriaIndex<'_>,
    warnings: &mut Vec<String>,
) -> Vec<&'a EvaluationRecord> {
    let mut unknown_po = BTreeSet::new();
    let mut unknown_count = 0usize;
    let mut kept = Vec::with_capacity(evaluations.len());

    for record in evaluations {
        if !index.contains(record.po) {
            unknown_po.insert(record.po);
            unknown_count += 1;
            continue;
        }
        if !index.allows(record.po, &record.role) {
            warnings.push(format!(
                "Role {} not allowed for Po={}; record ignored",
                record.role, record.po
            ));
            continue;
        }
        kept.push(record);
    }

    if unknown_count > 0 {
        let ids = unknown_po
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        // Keep this first so it reads as the run-level summary.
        warnings.insert(
            0,
            format!("Evaluations with unknown Po ignored: {unknown_count} record(s) for Po [{ids}]"),
        );
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::scoring::{Criterion, Employee, Score};
    use std::collections::{BTreeMap, HashMap};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn criterion(po: u32, period: Period, roles: &[&str]) -> Criterion {
        Criterion {
            po,
            category: "İş".to_string(),
            period,
            max_score: Some(5.0),
            description: format!("criterion {po}"),
            role_marks: roles
                .iter()
                .map(|role| (role.to_string(), "x".to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn employee(sicil: &str) -> Employee {
        Employee {
            sicil: sicil.to_string(),
            name: format!("Employee {sicil}"),
            department: "Lojistik".to_string(),
            title: "Planlamacı".to_string(),
        }
    }

    fn evaluation(sicil: &str, role: &str, po: u32, score: Score, on: NaiveDate) -> EvaluationRecord {
        EvaluationRecord {
            sicil: sicil.to_string(),
            role: role.to_string(),
            po,
            score,
            date: on,
            week: dates::iso_week_label(on),
        }
    }

    fn single_role_config() -> ScoringConfig {
        ScoringConfig {
            role_weights: HashMap::from([("Personel".to_string(), 1.0)]),
            category_weights: HashMap::from([("İş".to_string(), 1.0)]),
            ..ScoringConfig::default()
        }
    }

    #[test]
    fn weekly_evaluation_in_current_week_scores_eighty() {
        let workbook = Workbook {
            criteria: vec![criterion(1, Period::Weekly, &["Personel"])],
            employees: vec![employee("100")],
            evaluations: vec![evaluation("100", "Personel", 1, 4.0, date(2024, 3, 19))],
        };

        let result = summarize(&workbook, &single_role_config(), "2024-03-22")
            .expect("summary should succeed");

        assert_eq!(result.week, "2024-W12");
        assert_eq!(result.scores.len(), 1);
        assert_eq!(result.scores[0].total, 80.0);
        assert_eq!(result.scores[0].week, "2024-W12");
        assert!(result.missing.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn evaluation_from_other_week_leaves_total_zero_and_one_missing_row() {
        let workbook = Workbook {
            criteria: vec![criterion(1, Period::Weekly, &["Personel"])],
            employees: vec![employee("100")],
            evaluations: vec![evaluation("100", "Personel", 1, 4.0, date(2024, 3, 12))],
        };

        let result = summarize(&workbook, &single_role_config(), "2024-03-22")
            .expect("summary should succeed");

        assert_eq!(result.scores[0].total, 0.0);
        assert_eq!(result.missing.len(), 1);
        assert_eq!(result.missing[0].missing_roles, "Personel");
        assert_eq!(result.missing[0].sicil, "100");
    }

    #[test]
    fn detection_window_includes_recent_and_excludes_old_records() {
        let workbook = Workbook {
            criteria: vec![criterion(1, Period::Detection, &["Personel"])],
            employees: vec![employee("recent"), employee("old")],
            evaluations: vec![
                evaluation("recent", "Personel", 1, 5.0, date(2024, 3, 18)),
                evaluation("old", "Personel", 1, 5.0, date(2024, 1, 1)),
            ],
        };

        let result = summarize(&workbook, &single_role_config(), "2024-03-22")
            .expect("summary should succeed");

        assert_eq!(result.scores[0].total, 100.0);
        assert_eq!(result.scores[1].total, 0.0);
        assert_eq!(result.missing.len(), 1);
        assert_eq!(result.missing[0].sicil, "old");
        assert_eq!(result.missing[0].period, "Tespit");
    }

    #[test]
    fn latest_evaluation_wins() {
        let workbook = Workbook {
            criteria: vec![criterion(1, Period::Detection, &["Personel"])],
            employees: vec![employee("100")],
            evaluations: vec![
                evaluation("100", "Personel", 1, 2.0, date(2024, 3, 18)),
                evaluation("100", "Personel", 1, 5.0, date(2024, 3, 10)),
            ],
        };

        let result = summarize(&workbook, &single_role_config(), "2024-03-22")
            .expect("summary should succeed");

        assert_eq!(result.scores[0].total, 40.0);
    }

    #[test]
    fn unrecognized_period_warns_and_reports_missing_for_every_employee() {
        let workbook = Workbook {
            criteria: vec![criterion(5, Period::Other("Aylık".to_string()), &["Personel", "Şef"])],
            employees: vec![employee("1"), employee("2")],
            evaluations: vec![evaluation("1", "Personel", 5, 5.0, date(2024, 3, 20))],
        };

        let result = summarize(&workbook, &ScoringConfig::default(), "2024-03-22")
            .expect("summary should succeed");

        assert_eq!(result.warnings, vec!["Unknown period 'Aylık' for Po=5".to_string()]);
        assert!(result.scores.iter().all(|row| row.total == 0.0));
        assert_eq!(result.missing.len(), 2);
        assert!(result
            .missing
            .iter()
            .all(|row| row.missing_roles == "Personel, Şef"));
    }

    #[test]
    fn threshold_filters_employees_with_too_few_missing_rows() {
        let workbook = Workbook {
            criteria: vec![
                criterion(1, Period::Weekly, &["Personel"]),
                criterion(2, Period::Weekly, &["Personel"]),
            ],
            employees: vec![employee("one-missing"), employee("two-missing")],
            evaluations: vec![evaluation("one-missing", "Personel", 1, 5.0, date(2024, 3, 20))],
        };
        let config = ScoringConfig {
            missing_threshold: Some(2),
            ..single_role_config()
        };

        let result = summarize(&workbook, &config, "2024-03-22").expect("summary should succeed");

        assert_eq!(result.missing.len(), 2);
        assert!(result.missing.iter().all(|row| row.sicil == "two-missing"));
        assert_eq!(result.scores[0].total, 100.0);
    }

    #[test]
    fn unknown_criteria_and_ineligible_roles_are_dropped_with_warnings() {
        let workbook = Workbook {
            criteria: vec![criterion(1, Period::Weekly, &["Personel"])],
            employees: vec![employee("100")],
            evaluations: vec![
                evaluation("100", "Personel", 42, 5.0, date(2024, 3, 20)),
                evaluation("100", "Personel", 7, 5.0, date(2024, 3, 20)),
                evaluation("100", "Personel", 42, 5.0, date(2024, 3, 21)),
                evaluation("100", "Şef", 1, 5.0, date(2024, 3, 20)),
                evaluation("100", "Personel", 1, 5.0, date(2024, 3, 20)),
            ],
        };

        let result = summarize(&workbook, &single_role_config(), "2024-03-22")
            .expect("summary should succeed");

        assert_eq!(
            result.warnings,
            vec![
                "Evaluations with unknown Po ignored: 3 record(s) for Po [7, 42]".to_string(),
                "Role Şef not allowed for Po=1; record ignored".to_string(),
            ]
        );
        assert_eq!(result.scores[0].total, 100.0);
    }

    #[test]
    fn invalid_as_of_date_aborts_before_criteria_check() {
        let workbook = Workbook::default();
        let err = summarize(&workbook, &ScoringConfig::default(), "2024-02-30")
            .expect_err("summary should fail");
        assert!(matches!(err, ScorecardError::InvalidAsOfDate(ref value) if value == "2024-02-30"));
        assert!(err.to_string().contains("select a valid calendar date"));
    }

    #[test]
    fn offset_as_of_is_read_in_configured_zone() {
        let workbook = Workbook {
            criteria: vec![criterion(1, Period::Weekly, &["Personel"])],
            employees: vec![employee("100")],
            evaluations: vec![evaluation("100", "Personel", 1, 4.0, date(2024, 3, 25))],
        };

        let result = summarize(&workbook, &single_role_config(), "2024-03-24T22:30:00+00:00")
            .expect("summary should succeed");
        assert_eq!(result.as_of, date(2024, 3, 25));
        assert_eq!(result.week, "2024-W13");
        assert_eq!(result.scores[0].total, 80.0);

        let utc = ScoringConfig {
            timezone: chrono_tz::UTC,
            ..single_role_config()
        };
        let result = summarize(&workbook, &utc, "2024-03-24T22:30:00+00:00")
            .expect("summary should succeed");
        assert_eq!(result.week, "2024-W12");
        assert_eq!(result.scores[0].total, 0.0);
    }

    #[test]
    fn empty_criteria_abort_the_run() {
        let workbook = Workbook {
            employees: vec![employee("100")],
            ..Workbook::default()
        };
        let err = summarize(&workbook, &ScoringConfig::default(), "2024-03-22")
            .expect_err("summary should fail");
        assert!(matches!(err, ScorecardError::EmptyCriteria));
    }

    #[test]
    fn employees_without_scorable_criteria_total_zero() {
        let workbook = Workbook {
            criteria: vec![criterion(1, Period::Weekly, &[])],
            employees: vec![employee("100")],
            evaluations: vec![evaluation("100", "Personel", 1, 5.0, date(2024, 3, 20))],
        };

        let result = summarize(&workbook, &ScoringConfig::default(), "2024-03-22")
            .expect("summary should succeed");

        assert_eq!(result.scores[0].total, 0.0);
        assert!(result.missing.is_empty());
    }

    #[test]
    fn clamping_caps_scores_at_max_and_floors_negatives() {
        let workbook = Workbook {
            criteria: vec![
                criterion(1, Period::Weekly, &["Personel"]),
                criterion(2, Period::Weekly, &["Personel"]),
            ],
            employees: vec![employee("100")],
            evaluations: vec![
                evaluation("100", "Personel", 1, 12.0, date(2024, 3, 20)),
                evaluation("100", "Personel", 2, -3.0, date(2024, 3, 20)),
            ],
        };

        let result = summarize(&workbook, &single_role_config(), "2024-03-22")
            .expect("summary should succeed");

        assert_eq!(result.scores[0].total, 50.0);
    }

    #[test]
    fn check_reports_unscorable_criteria_and_unknown_references() {
        let workbook = Workbook {
            criteria: vec![
                criterion(1, Period::Weekly, &["Personel"]),
                criterion(2, Period::Weekly, &[]),
                criterion(3, Period::Other("Aylık".to_string()), &["Şef"]),
            ],
            employees: vec![employee("100")],
            evaluations: vec![
                evaluation("100", "Personel", 1, 5.0, date(2024, 3, 20)),
                evaluation("100", "Personel", 9, 5.0, date(2024, 3, 20)),
            ],
        };

        let summary = check(&workbook, &ScoringConfig::default()).expect("check should succeed");

        assert_eq!(summary.criteria, 3);
        assert_eq!(summary.scorable, 2);
        assert_eq!(summary.employees, 1);
        assert_eq!(summary.evaluations, 2);
        assert_eq!(
            summary.findings,
            vec![
                "Po=2 has no eligible role marked with 'x'".to_string(),
                "Unknown period 'Aylık' for Po=3".to_string(),
                "Evaluations reference unknown Po [9]".to_string(),
            ]
        );
    }

    #[test]
    fn check_of_clean_workbook_has_no_findings() {
        let workbook = Workbook {
            criteria: vec![criterion(1, Period::Detection, &["Personel"])],
            employees: vec![employee("100")],
            evaluations: Vec::new(),
        };

        let summary = check(&workbook, &ScoringConfig::default()).expect("check should succeed");
        assert!(summary.findings.is_empty());
    }

    #[test]
    fn repeated_runs_are_identical_and_bounded() {
        let workbook = Workbook {
            criteria: vec![
                criterion(1, Period::Weekly, &["Personel", "Şef", "Yönetici"]),
                criterion(2, Period::Detection, &["Şef"]),
            ],
            employees: vec![employee("a"), employee("b"), employee("c")],
            evaluations: vec![
                evaluation("a", "Personel", 1, 3.0, date(2024, 3, 19)),
                evaluation("a", "Yönetici", 1, 4.5, date(2024, 3, 21)),
                evaluation("b", "Şef", 2, 9.0, date(2024, 3, 1)),
                evaluation("c", "Şef", 1, 1.0, date(2024, 3, 18)),
            ],
        };
        let config = ScoringConfig::default();

        let first = summarize(&workbook, &config, "2024-03-22").expect("first run");
        let second = summarize(&workbook, &config, "2024-03-22").expect("second run");

        assert_eq!(first, second);
        assert!(first
            .scores
            .iter()
            .all(|row| (0.0..=100.0).contains(&row.total)));
        let order = first
            .scores
            .iter()
            .map(|row| row.sicil.as_str())
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["a", "b", "c"]);
    }
}
