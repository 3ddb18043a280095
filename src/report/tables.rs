use crate::engine::missing::counts_by_employee;
use crate::error::Result;
use crate::types::scoring::{MissingRow, ScoreResult, ScoreRow};
use serde::Serialize;
use std::io::Write;

const SCORE_COLUMNS: [&str; 6] = ["Sicil", "AdSoyad", "Departman", "Unvan", "ToplamSkor", "Hafta"];
const MISSING_COLUMNS: [&str; 6] = [
    "Sicil",
    "AdSoyad",
    "Po",
    "Değerlendirme",
    "Period",
    "Eksik_Roller",
];
const DATASET_COLUMNS: [&str; 7] = [
    "Sicil",
    "AdSoyad",
    "Departman",
    "Unvan",
    "ToplamSkor",
    "Hafta",
    "EksikSayisi",
];

#[derive(Debug, Serialize)]
struct DatasetRow<'a> {
    #[serde(rename = "Sicil")]
    sicil: &'a str,
    #[serde(rename = "AdSoyad")]
    name: &'a str,
    #[serde(rename = "Departman")]
    department: &'a str,
    #[serde(rename = "Unvan")]
    title: &'a str,
    #[serde(rename = "ToplamSkor")]
    total: f64,
    #[serde(rename = "Hafta")]
    week: &'a str,
    #[serde(rename = "EksikSayisi")]
    missing_count: usize,
}

pub fn write_scores<W: Write>(writer: W, rows: &[ScoreRow]) -> Result<()> {
    write_rows(writer, &SCORE_COLUMNS, rows)
}

pub fn write_missing<W: Write>(writer: W, rows: &[MissingRow]) -> Result<()> {
    write_rows(writer, &MISSING_COLUMNS, rows)
}

pub fn write_dataset<W: Write>(writer: W, result: &ScoreResult) -> Result<()> {
    let counts = counts_by_employee(&result.missing);
    let rows = result
        .scores
        .iter()
        .map(|score| DatasetRow {
            sicil: &score.sicil,
            name: &score.name,
            department: &score.department,
            title: &score.title,
            total: score.total,
            week: &score.week,
            missing_count: counts.get(score.sicil.as_str()).copied().unwrap_or(0),
        })
        .collect::<Vec<_>>();
    write_rows(writer, &DATASET_COLUMNS, &rows)
}

pub fn to_csv(result: &ScoreResult) -> Result<String> {
    let mut buffer = Vec::new();
    write_scores(&mut buffer, &result.scores)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// The header is written even when there are no rows.
fn write_rows<W: Write, T: Serialize>(writer: W, columns: &[&str], rows: &[T]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(columns)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_result;

    #[test]
    fn score_csv_has_header_and_rows() {
        let rendered = to_csv(&sample_result()).expect("csv should render");
        let mut lines = rendered.lines();
        assert_eq!(lines.next(), Some("Sicil,AdSoyad,Departman,Unvan,ToplamSkor,Hafta"));
        assert_eq!(lines.next(), Some("100,Ayşe Yılmaz,Planlama,Uzman,80.0,2024-W12"));
        assert_eq!(lines.next(), Some("200,Mehmet Kaya,Lojistik,Şef,0.0,2024-W12"));
    }

    #[test]
    fn missing_csv_quotes_joined_roles() {
        let mut buffer = Vec::new();
        write_missing(&mut buffer, &sample_result().missing).expect("csv should render");
        let rendered = String::from_utf8(buffer).expect("utf-8 output");
        assert!(rendered.starts_with("Sicil,AdSoyad,Po,Değerlendirme,Period,Eksik_Roller\n"));
        assert!(rendered.contains("200,Mehmet Kaya,2,Uyum,Tespit,\"Personel, Şef\""));
    }

    #[test]
    fn empty_missing_table_still_has_header() {
        let mut buffer = Vec::new();
        write_missing(&mut buffer, &[]).expect("csv should render");
        let rendered = String::from_utf8(buffer).expect("utf-8 output");
        assert_eq!(rendered, "Sicil,AdSoyad,Po,Değerlendirme,Period,Eksik_Roller\n");
    }

    #[test]
    fn dataset_counts_missing_rows_per_employee() {
        let mut buffer = Vec::new();
        write_dataset(&mut buffer, &sample_result()).expect("csv should render");
        let rendered = String::from_utf8(buffer).expect("utf-8 output");
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "Sicil,AdSoyad,Departman,Unvan,ToplamSkor,Hafta,EksikSayisi");
        assert!(lines[1].ends_with(",0"));
        assert!(lines[2].ends_with(",1"));
    }
}
