use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "scorecard",
    version,
    about = "Employee performance scorecard and missing-evaluation report CLI"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the scorecard for a week
    Report(ReportCommand),
    /// List employees with missing evaluations
    Missing(MissingCommand),
    /// Validate configuration and workbook without scoring
    Check(CheckCommand),
    /// Append one evaluation to the workbook
    Record(RecordCommand),
}

#[derive(Args)]
pub struct WorkbookArgs {
    /// Directory holding Kriterler.csv, Calisanlar.csv and Degerlendirmeler.csv
    pub path: PathBuf,
    /// Config file used instead of <PATH>/scorecard.toml
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ReportCommand {
    #[command(flatten)]
    pub workbook: WorkbookArgs,
    /// Reference date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub asof: Option<String>,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// Directory for CSV report tables
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct MissingCommand {
    #[command(flatten)]
    pub workbook: WorkbookArgs,
    #[arg(long)]
    pub asof: Option<String>,
    /// Keep employees with at least this many missing rows
    #[arg(long)]
    pub threshold: Option<u32>,
}

#[derive(Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub workbook: WorkbookArgs,
}

#[derive(Args)]
pub struct RecordCommand {
    #[command(flatten)]
    pub workbook: WorkbookArgs,
    #[arg(long)]
    pub sicil: String,
    #[arg(long)]
    pub rol: String,
    #[arg(long, allow_negative_numbers = true)]
    pub po: i64,
    #[arg(long, allow_negative_numbers = true)]
    pub puan: f64,
    #[arg(long)]
    pub note: Option<String>,
    /// Evaluation date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub tarih: Option<String>,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
    Csv,
}
