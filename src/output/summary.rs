use crate::runner::{BatchStatus, SessionReport};

const COMMENT_WIDTH: usize = 60;

/// Plain-text table of per-file outcomes printed after a run
pub fn render_summary(report: &SessionReport) -> String {
    let mut out = String::new();
    let totals = report.totals();

    out.push_str("=== Batch Summary ===\n\n");

    let name_width = report
        .records
        .iter()
        .map(|r| r.filename.chars().count())
        .max()
        .unwrap_or(0)
        .max("File".len());

    out.push_str(&format!(
        "{:<width$}  {:>5}  {}\n",
        "File",
        "Score",
        "Outcome",
        width = name_width
    ));

    for record in &report.records {
        let (score, outcome) = match &record.status {
            BatchStatus::Success => (
                record.quality_score.to_string(),
                first_line(&record.reviewer_comments),
            ),
            BatchStatus::Error(message) => ("-".to_string(), format!("FAILED: {}", message)),
            BatchStatus::Pending => ("-".to_string(), "pending".to_string()),
        };
        out.push_str(&format!(
            "{:<width$}  {:>5}  {}\n",
            record.filename,
            score,
            truncate(&outcome, COMMENT_WIDTH),
            width = name_width
        ));
    }

    out.push('\n');
    out.push_str(&format!(
        "{} files: {} succeeded, {} failed",
        totals.total, totals.succeeded, totals.failed
    ));
    if let Some(mean) = totals.mean_score {
        out.push_str(&format!(", mean score {:.1}", mean));
    }
    out.push('\n');
    out
}

fn first_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("")
        .to_string()
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut)
}
