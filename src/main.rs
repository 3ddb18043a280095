mod cli;
mod config;
mod dates;
mod engine;
mod error;
mod report;
mod telemetry;
mod types;
mod workbook;

use crate::error::{Result, ScorecardError};
use crate::types::config::ScorecardConfig;
use crate::types::scoring::ScoreResult;
use clap::Parser;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const BLOCKING: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn run() -> Result<i32> {
    let cli = cli::Cli::parse();
    match cli.command {
        cli::Commands::Report(cmd) => {
            let cfg = prepare(&cmd.workbook, cli.verbose, cli.quiet)?;
            let result = score(&cmd.workbook, &cfg, cmd.asof)?;

            let output_format = match cmd.format {
                cli::ReportFormat::Json => report::OutputFormat::Json,
                cli::ReportFormat::Md => report::OutputFormat::Md,
                cli::ReportFormat::Csv => report::OutputFormat::Csv,
            };
            let rendered = report::render(&result, output_format)?;
            println!("{rendered}");

            let table_dir = cmd
                .output
                .or_else(|| cfg.output.csv_export.then(|| cfg.output.report_dir.clone()));
            if let Some(dir) = table_dir {
                report::export::write_report_tables(&dir, &result)?;
            }
            if cfg.output.powerbi_export {
                let dir = cfg
                    .output
                    .powerbi_output
                    .as_ref()
                    .unwrap_or(&cfg.output.report_dir);
                report::export::write_powerbi_dataset(dir, &result)?;
            }

            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Missing(cmd) => {
            let mut cfg = prepare(&cmd.workbook, cli.verbose, cli.quiet)?;
            if let Some(threshold) = cmd.threshold {
                cfg.scoring.missing_threshold = Some(threshold);
            }
            let result = score(&cmd.workbook, &cfg, cmd.asof)?;

            if result.missing.is_empty() {
                println!("missing: no missing evaluations for {}", result.week);
                return Ok(exit_code::SUCCESS);
            }

            println!("missing evaluations for {}:", result.week);
            for row in &result.missing {
                println!(
                    "- {} {}: Po={} {} [{}] missing {}",
                    row.sicil, row.name, row.po, row.description, row.period, row.missing_roles
                );
            }
            Ok(exit_code::WARNINGS)
        }
        cli::Commands::Check(cmd) => {
            let cfg = prepare(&cmd.workbook, cli.verbose, cli.quiet)?;
            let workbook = workbook::load_workbook(&cmd.workbook.path, &cfg.data, &cfg.scoring)?;
            let check = engine::check(&workbook, &cfg.scoring)?;

            println!(
                "criteria: {} ({} scorable)",
                check.criteria, check.scorable
            );
            println!("employees: {}", check.employees);
            println!("evaluations: {}", check.evaluations);

            if check.findings.is_empty() {
                println!("check: no findings");
                return Ok(exit_code::SUCCESS);
            }
            for finding in &check.findings {
                println!("[BLOCKING] {finding}");
            }
            Ok(exit_code::BLOCKING)
        }
        cli::Commands::Record(cmd) => {
            let cfg = prepare(&cmd.workbook, cli.verbose, cli.quiet)?;
            let evaluation = workbook::record::NewEvaluation {
                sicil: cmd.sicil,
                role: cmd.rol,
                po: cmd.po,
                score: cmd.puan,
                date: cmd.tarih,
                note: cmd.note,
            }
            .validate(
                &cfg.scoring.roles,
                cfg.scoring.timezone,
                dates::today(cfg.scoring.timezone),
            )?;
            let path = workbook::record::append_evaluation(&cmd.workbook.path, &evaluation)?;

            println!(
                "recorded: sicil={} po={} rol={} week={} -> {}",
                evaluation.sicil,
                evaluation.po,
                evaluation.role,
                evaluation.week,
                path.display()
            );
            Ok(exit_code::SUCCESS)
        }
    }
}

fn prepare(args: &cli::WorkbookArgs, verbose: u8, quiet: bool) -> Result<ScorecardConfig> {
    if !args.path.exists() {
        return Err(ScorecardError::PathNotFound(args.path.display().to_string()));
    }

    let loaded = config::load_config(&args.path, args.config.as_deref())?;
    let missing_config = loaded.is_none();
    let cfg = loaded.unwrap_or_default();
    telemetry::init(&cfg.logging.level, verbose, quiet)?;
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "scorecard starting");

    if missing_config {
        tracing::warn!(
            "no {} found in {}; using default weights",
            config::DEFAULT_CONFIG_FILE,
            args.path.display()
        );
    }
    cfg.validate()?;
    Ok(cfg)
}

fn score(
    args: &cli::WorkbookArgs,
    cfg: &ScorecardConfig,
    asof: Option<String>,
) -> Result<ScoreResult> {
    let tz = cfg.scoring.timezone;
    let as_of = asof.unwrap_or_else(|| dates::today(tz).format("%Y-%m-%d").to_string());
    // Reject a bad date before touching the workbook.
    engine::parse_as_of(&as_of, tz)?;

    let workbook = workbook::load_workbook(&args.path, &cfg.data, &cfg.scoring)?;
    let result = engine::summarize(&workbook, &cfg.scoring, &as_of)?;

    tracing::info!(
        week = %result.week,
        scores = result.scores.len(),
        missing = result.missing.len(),
        "scorecard ready"
    );
    for warning in &result.warnings {
        tracing::warn!("{warning}");
    }
    Ok(result)
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
