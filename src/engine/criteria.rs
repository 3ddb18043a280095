use crate::error::{Result, ScorecardError};
use crate::types::scoring::Criterion;
use std::collections::HashMap;

const ELIGIBLE_MARK: &str = "x";

#[derive(Debug, Clone)]
pub struct IndexedCriterion<'a> {
    pub criterion: &'a Criterion,
    pub roles: Vec<&'a str>,
}

#[derive(Debug, Clone)]
pub struct CriteriaIndex<'a> {
    entries: Vec<IndexedCriterion<'a>>,
    by_po: HashMap<u32, usize>,
}

impl<'a> CriteriaIndex<'a> {
    pub fn build(criteria: &'a [Criterion], roles: &'a [String]) -> Result<Self> {
        let mut entries = Vec::with_capacity(criteria.len());
        let mut by_po = HashMap::with_capacity(criteria.len());

        for criterion in criteria {
            if by_po.contains_key(&criterion.po) {
                tracing::debug!(po = criterion.po, "duplicate criterion ignored");
                continue;
            }
            let eligible = roles
                .iter()
                .map(String::as_str)
                .filter(|role| is_marked(criterion, role))
                .collect::<Vec<_>>();
            by_po.insert(criterion.po, entries.len());
            entries.push(IndexedCriterion {
                criterion,
                roles: eligible,
            });
        }

        if entries.is_empty() {
            return Err(ScorecardError::EmptyCriteria);
        }
        Ok(Self { entries, by_po })
    }

    pub fn get(&self, po: u32) -> Option<&IndexedCriterion<'a>> {
        self.by_po.get(&po).map(|&slot| &self.entries[slot])
    }

    pub fn contains(&self, po: u32) -> bool {
        self.by_po.contains_key(&po)
    }

    pub fn allows(&self, po: u32, role: &str) -> bool {
        self.get(po)
            .map(|entry| entry.roles.contains(&role))
            .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedCriterion<'a>> {
        self.entries.iter()
    }

    pub fn scorable(&self) -> impl Iterator<Item = &IndexedCriterion<'a>> {
        self.entries.iter().filter(|entry| !entry.roles.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn is_marked(criterion: &Criterion, role: &str) -> bool {
    criterion
        .role_marks
        .get(role)
        .map(|mark| mark.trim().eq_ignore_ascii_case(ELIGIBLE_MARK))
        .unwrap_or(false)
}
