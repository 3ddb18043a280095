use crate::dates;
use crate::engine::criteria::IndexedCriterion;
use crate::types::scoring::{EvaluationRecord, Period, Score};
use chrono::NaiveDate;
use std::collections::HashMap;

type RecordKey<'a> = (&'a str, u32, &'a str);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    Scored(Score),
    Absent,
    UnsupportedPeriod,
}

#[derive(Debug)]
pub struct Selector<'a> {
    records: HashMap<RecordKey<'a>, Vec<&'a EvaluationRecord>>,
    week: String,
    window_start: NaiveDate,
    as_of: NaiveDate,
}

impl<'a> Selector<'a> {
    pub fn new<I>(evaluations: I, as_of: NaiveDate, detection_window_days: u32) -> Self
    where
        I: IntoIterator<Item = &'a EvaluationRecord>,
    {
        let mut records: HashMap<RecordKey<'a>, Vec<&'a EvaluationRecord>> = HashMap::new();
        for record in evaluations {
            records
                .entry((record.sicil.as_str(), record.po, record.role.as_str()))
                .or_default()
                .push(record);
        }

        Self {
            records,
            week: dates::iso_week_label(as_of),
            window_start: dates::window_start(as_of, detection_window_days),
            as_of,
        }
    }

    pub fn week(&self) -> &str {
        &self.week
    }

    pub fn select(&self, sicil: &str, entry: &IndexedCriterion<'_>, role: &str) -> Selection {
        let criterion = entry.criterion;
        if matches!(criterion.period, Period::Other(_)) {
            return Selection::UnsupportedPeriod;
        }

        let Some(candidates) = self.records.get(&(sicil, criterion.po, role)) else {
            return Selection::Absent;
        };

        // max_by_key keeps the last of equal maxima, so later input rows win ties.
        let latest = candidates
            .iter()
            .filter(|record| self.in_window(&criterion.period, record))
            .max_by_key(|record| record.date);

        match latest {
            Some(record) => Selection::Scored(normalize(record.score, criterion.max_score)),
            None => Selection::Absent,
        }
    }

    fn in_window(&self, period: &Period, record: &EvaluationRecord) -> bool {
        match period {
            Period::Weekly => record.week == self.week,
            Period::Detection => record.date >= self.window_start && record.date <= self.as_of,
            Period::Other(_) => false,
        }
    }
}

/// Clamps a raw score into `[0, max]` and scales it to `[0, 1]`.
pub fn normalize(raw: Score, max_score: Option<Score>) -> Score {
    match max_score.filter(|max| max.is_finite() && *max > 0.0) {
        Some(max) => raw.clamp(0.0, max) / max,
        None => 0.0,
    }
}
