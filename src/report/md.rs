use crate::types::scoring::ScoreResult;

pub fn to_markdown(result: &ScoreResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Scorecard {}\n\n", result.week));
    output.push_str(&format!("As of: {}\n\n", result.as_of.format("%Y-%m-%d")));

    output.push_str("## Scores\n\n");
    if result.scores.is_empty() {
        output.push_str("- none\n\n");
    } else {
        output.push_str("| Sicil | AdSoyad | Departman | Unvan | ToplamSkor |\n");
        output.push_str("|---|---|---|---|---:|\n");
        for row in &result.scores {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {:.2} |\n",
                cell(&row.sicil),
                cell(&row.name),
                cell(&row.department),
                cell(&row.title),
                row.total
            ));
        }
        output.push('\n');
    }

    output.push_str("## Missing Evaluations\n\n");
    if result.missing.is_empty() {
        output.push_str("- none\n\n");
    } else {
        output.push_str("| Sicil | AdSoyad | Po | Değerlendirme | Period | Eksik_Roller |\n");
        output.push_str("|---|---|---:|---|---|---|\n");
        for row in &result.missing {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                cell(&row.sicil),
                cell(&row.name),
                row.po,
                cell(&row.description),
                cell(&row.period),
                cell(&row.missing_roles)
            ));
        }
        output.push('\n');
    }

    output.push_str("## Warnings\n\n");
    if result.warnings.is_empty() {
        output.push_str("- none\n");
    } else {
        for warning in &result.warnings {
            output.push_str(&format!("- {warning}\n"));
        }
    }

    output
}

fn cell(value: &str) -> String {
    value.replace('|', "\\|")
}
