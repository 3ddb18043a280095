use crate::error::{Result, ScorecardError};
use crate::report::tables::{write_dataset, write_missing, write_scores};
use crate::types::scoring::ScoreResult;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn write_report_tables(dir: &Path, result: &ScoreResult) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(ScorecardError::Io)?;

    let scores_path = dir.join(format!("rapor_{}_Skorlar.csv", result.week));
    write_scores(bom_writer(&scores_path)?, &result.scores)?;

    let missing_path = dir.join(format!("rapor_{}_EksikPuanlamalar.csv", result.week));
    write_missing(bom_writer(&missing_path)?, &result.missing)?;

    tracing::info!(
        scores = %scores_path.display(),
        missing = %missing_path.display(),
        "report tables written"
    );
    Ok(vec![scores_path, missing_path])
}

pub fn write_powerbi_dataset(dir: &Path, result: &ScoreResult) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(ScorecardError::Io)?;
    let path = dir.join(format!("scorecard_powerbi_{}.csv", result.week));
    write_dataset(bom_writer(&path)?, result)?;
    tracing::info!(dataset = %path.display(), "dashboard dataset written");
    Ok(path)
}

/// Spreadsheet tools need the BOM to detect UTF-8.
fn bom_writer(path: &Path) -> Result<BufWriter<File>> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(UTF8_BOM)?;
    Ok(writer)
}
