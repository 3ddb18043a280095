use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScorecardError {
    #[error("criteria sheet is empty: no criterion has a usable Po identifier")]
    EmptyCriteria,

    #[error("invalid as-of date '{0}': select a valid calendar date (YYYY-MM-DD)")]
    InvalidAsOfDate(String),

    #[error("workbook is missing the {0} sheet")]
    MissingSheet(String),

    #[error("workbook validation failed: {0}")]
    Validation(String),

    #[error("invalid evaluation record: {0}")]
    InvalidRecord(String),

    #[error("config file not found: {0}")]
    ConfigNotFound(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("telemetry error: {0}")]
    Telemetry(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ScorecardError>;
