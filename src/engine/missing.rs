use crate::types::scoring::MissingRow;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct MissingReport {
    rows: Vec<MissingRow>,
}

impl MissingReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: MissingRow) {
        self.rows.push(row);
    }

    pub fn finish(self, threshold: Option<u32>) -> Vec<MissingRow> {
        let Some(threshold) = threshold.filter(|threshold| *threshold > 0) else {
            return self.rows;
        };

        let threshold = threshold as usize;
        let keep = counts_by_employee(&self.rows)
            .into_iter()
            .filter(|(_, count)| *count >= threshold)
            .map(|(sicil, _)| sicil.to_string())
            .collect::<HashSet<_>>();

        self.rows
            .into_iter()
            .filter(|row| keep.contains(&row.sicil))
            .collect()
    }
}

pub fn counts_by_employee(rows: &[MissingRow]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for row in rows {
        *counts.entry(row.sicil.as_str()).or_default() += 1;
    }
    counts
}
