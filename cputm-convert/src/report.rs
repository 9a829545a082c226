use colored::Colorize;

use crate::import::{ImportReport, ImportStatus};
use crate::relink::{RelinkWarning, SkippedRule};
use crate::translate::TranslateWarning;

/// Render translator warnings for terminal output.
pub fn render_translate_warnings(warnings: &[TranslateWarning]) -> String {
    warnings
        .iter()
        .map(|warning| warning_line(&warning.code, &warning.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render relinker warnings for terminal output.
pub fn render_relink_warnings(warnings: &[RelinkWarning]) -> String {
    warnings
        .iter()
        .map(|warning| warning_line(&warning.code, &warning.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the rules a conversion had to skip.
pub fn render_skipped(skipped: &[SkippedRule]) -> String {
    let mut out = Vec::new();
    out.push("skipped_rules".to_string());
    if skipped.is_empty() {
        out.push("- none".to_string());
    } else {
        for skip in skipped {
            out.push(
                format!("! {}: {}", skip.name, skip.reason)
                    .magenta()
                    .to_string(),
            );
        }
    }
    out.join("\n")
}

/// Render per-entity import outcomes plus the closing summary line.
pub fn render_import_text(report: &ImportReport) -> String {
    let mut out = Vec::new();
    for outcome in &report.outcomes {
        let line = match &outcome.status {
            ImportStatus::Created { id } => {
                format!("+ {} {} id={id}", outcome.kind, outcome.name)
                    .green()
                    .to_string()
            }
            ImportStatus::Updated { id } => {
                format!("~ {} {} id={id}", outcome.kind, outcome.name)
                    .yellow()
                    .to_string()
            }
            ImportStatus::NoOpAlreadyCurrent { id } => {
                format!("= {} {} id={id}", outcome.kind, outcome.name)
            }
            ImportStatus::Failed { reason } => {
                format!("! {} {} {reason}", outcome.kind, outcome.name)
                    .red()
                    .to_string()
            }
        };
        out.push(line);
    }
    out.push(render_import_summary(report));
    out.join("\n")
}

/// Render import summary counts for terminal output.
pub fn render_import_summary(report: &ImportReport) -> String {
    format!(
        "import_summary created={} updated={} unchanged={} failed={}",
        report.created(),
        report.updated(),
        report.unchanged(),
        report.failed()
    )
    .cyan()
    .to_string()
}

fn warning_line(code: &str, message: &str) -> String {
    format!("~ {code}: {message}").yellow().to_string()
}
