use crate::types::config::ScoringConfig;
use crate::types::scoring::Score;
use std::collections::HashMap;

/// Roles without a configured weight do not count toward a criterion.
pub const DEFAULT_ROLE_WEIGHT: Score = 0.0;
pub const DEFAULT_CATEGORY_WEIGHT: Score = 1.0;

#[derive(Debug, Clone, Copy)]
pub struct WeightPolicy<'a> {
    role_weights: &'a HashMap<String, Score>,
    category_weights: &'a HashMap<String, Score>,
}

impl<'a> WeightPolicy<'a> {
    pub fn new(
        role_weights: &'a HashMap<String, Score>,
        category_weights: &'a HashMap<String, Score>,
    ) -> Self {
        Self {
            role_weights,
            category_weights,
        }
    }

    pub fn from_config(config: &'a ScoringConfig) -> Self {
        Self::new(&config.role_weights, &config.category_weights)
    }

    pub fn role_weight(&self, role: &str) -> Score {
        self.role_weights
            .get(role)
            .copied()
            .unwrap_or(DEFAULT_ROLE_WEIGHT)
    }

    pub fn category_weight(&self, category: &str) -> Score {
        self.category_weights
            .get(category)
            .copied()
            .unwrap_or(DEFAULT_CATEGORY_WEIGHT)
    }
}
