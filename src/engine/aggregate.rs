use crate::engine::criteria::{CriteriaIndex, IndexedCriterion};
use crate::engine::missing::MissingReport;
use crate::engine::selector::{Selection, Selector};
use crate::engine::weights::WeightPolicy;
use crate::types::scoring::{Employee, MissingRow, Score};

#[derive(Debug, Clone, PartialEq)]
pub struct CriterionOutcome<'a> {
    pub contribution: Option<(Score, Score)>,
    pub missing_roles: Vec<&'a str>,
    pub unsupported_period: bool,
}

pub fn score_criterion<'a>(
    sicil: &str,
    entry: &IndexedCriterion<'a>,
    selector: &Selector<'_>,
    weights: &WeightPolicy<'_>,
) -> CriterionOutcome<'a> {
    let mut scored = Vec::with_capacity(entry.roles.len());
    let mut unscored = Vec::new();
    let mut unsupported_period = false;

    for &role in &entry.roles {
        match selector.select(sicil, entry, role) {
            Selection::Scored(score) => scored.push((role, score)),
            Selection::Absent => unscored.push(role),
            Selection::UnsupportedPeriod => {
                unsupported_period = true;
                unscored.push(role);
            }
        }
    }

    let (numerator, denominator) = scored
        .iter()
        .fold((0.0, 0.0), |(num, den), (role, score)| {
            let weight = weights.role_weight(role);
            (num + weight * score, den + weight)
        });

    if scored.is_empty() || denominator == 0.0 {
        return CriterionOutcome {
            contribution: None,
            missing_roles: entry.roles.clone(),
            unsupported_period,
        };
    }

    let category_weight = weights.category_weight(&entry.criterion.category);
    CriterionOutcome {
        contribution: Some(((numerator / denominator) * category_weight, category_weight)),
        missing_roles: unscored,
        unsupported_period,
    }
}

pub fn score_employee(
    employee: &Employee,
    index: &CriteriaIndex<'_>,
    selector: &Selector<'_>,
    weights: &WeightPolicy<'_>,
    missing: &mut MissingReport,
    warnings: &mut Vec<String>,
) -> Score {
    let mut contributions: Score = 0.0;
    let mut contribution_weights: Score = 0.0;

    for entry in index.scorable() {
        let outcome = score_criterion(&employee.sicil, entry, selector, weights);
        let criterion = entry.criterion;

        if outcome.unsupported_period {
            push_unique(
                warnings,
                format!(
                    "Unknown period '{}' for Po={}",
                    criterion.period, criterion.po
                ),
            );
        }

        if let Some((score, weight)) = outcome.contribution {
            contributions += score;
            contribution_weights += weight;
        }

        if !outcome.missing_roles.is_empty() {
            missing.push(MissingRow {
                sicil: employee.sicil.clone(),
                name: employee.name.clone(),
                po: criterion.po,
                description: criterion.description.clone(),
                period: criterion.period.label().to_string(),
                missing_roles: join_roles(&outcome.missing_roles),
            });
        }
    }

    total_score(contributions, contribution_weights)
}

pub fn total_score(contributions: Score, weights: Score) -> Score {
    if weights <= 0.0 {
        return 0.0;
    }
    round2((100.0 * contributions / weights).clamp(0.0, 100.0))
}

/// Rounds to two decimals, halves away from zero.
pub fn round2(value: Score) -> Score {
    (value * 100.0).round() / 100.0
}

fn join_roles(roles: &[&str]) -> String {
    let mut sorted = roles.to_vec();
    sorted.sort_unstable();
    sorted.join(", ")
}

fn push_unique(warnings: &mut Vec<String>, message: String) {
    if !warnings.contains(&message) {
        warnings.push(message);
    }
}
