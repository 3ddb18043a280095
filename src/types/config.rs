use crate::error::ScorecardError;
use chrono_tz::Tz;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScorecardConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,
    #[serde(default = "default_role_weights")]
    pub role_weights: HashMap<String, f64>,
    #[serde(default = "default_category_weights")]
    pub category_weights: HashMap<String, f64>,
    #[serde(default = "default_detection_window_days")]
    pub detection_window_days: u32,
    pub missing_threshold: Option<u32>,
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            roles: default_roles(),
            role_weights: default_role_weights(),
            category_weights: default_category_weights(),
            detection_window_days: default_detection_window_days(),
            missing_threshold: None,
            timezone: default_timezone(),
        }
    }
}

fn default_roles() -> Vec<String> {
    ["Personel", "Şef", "Yönetici"]
        .iter()
        .map(|role| role.to_string())
        .collect()
}

fn default_role_weights() -> HashMap<String, f64> {
    HashMap::from([
        ("Personel".to_string(), 0.20),
        ("Şef".to_string(), 0.40),
        ("Yönetici".to_string(), 0.40),
    ])
}

fn default_category_weights() -> HashMap<String, f64> {
    HashMap::from([("İş".to_string(), 1.0), ("Kanaat".to_string(), 0.7)])
}

fn default_detection_window_days() -> u32 {
    30
}

fn default_timezone() -> Tz {
    chrono_tz::Europe::Istanbul
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataConfig {
    pub employees_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
    #[serde(default)]
    pub csv_export: bool,
    #[serde(default)]
    pub powerbi_export: bool,
    pub powerbi_output: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_dir: default_report_dir(),
            csv_export: false,
            powerbi_export: false,
            powerbi_output: None,
        }
    }
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("reports")
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl ScorecardConfig {
    pub fn validate(&self) -> Result<(), ScorecardError> {
        self.scoring.validate()
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ScorecardError> {
        if self.roles.is_empty() {
            return Err(ScorecardError::ConfigParse(
                "scoring.roles must name at least one role".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for role in &self.roles {
            let normalized = role.trim();
            if normalized.is_empty() {
                return Err(ScorecardError::ConfigParse(
                    "scoring.roles entries must be non-empty role names".to_string(),
                ));
            }
            if !seen.insert(normalized) {
                return Err(ScorecardError::ConfigParse(format!(
                    "scoring.roles contains duplicate role: {normalized}"
                )));
            }
        }

        validate_weights("scoring.role_weights", &self.role_weights)?;
        validate_weights("scoring.category_weights", &self.category_weights)?;

        let mut unknown = self
            .role_weights
            .keys()
            .filter(|role| !seen.contains(role.trim()))
            .cloned()
            .collect::<Vec<_>>();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(ScorecardError::ConfigParse(format!(
                "scoring.role_weights contains unknown role(s): {}; \
                 set [scoring.role_weights] for the roles in scoring.roles",
                unknown.join(", ")
            )));
        }

        Ok(())
    }

    pub fn effective_missing_threshold(&self) -> Option<u32> {
        self.missing_threshold.filter(|threshold| *threshold > 0)
    }
}

fn validate_weights(section: &str, weights: &HashMap<String, f64>) -> Result<(), ScorecardError> {
    let mut invalid = weights
        .iter()
        .filter(|(_, weight)| !weight.is_finite() || **weight < 0.0)
        .map(|(key, _)| key.clone())
        .collect::<Vec<_>>();
    if invalid.is_empty() {
        return Ok(());
    }
    invalid.sort();
    Err(ScorecardError::ConfigParse(format!(
        "{section} values must be finite and >= 0.0 (invalid: {})",
        invalid.join(", ")
    )))
}
