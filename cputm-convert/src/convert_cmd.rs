use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use cputm_convert::relink::{relink, Relinked, RelinkWarning, SkippedRule};
use cputm_convert::report::{render_relink_warnings, render_skipped, render_translate_warnings};
use cputm_convert::source::load_export;
use cputm_convert::summary::{render as render_convert_summary, summarize, ConversionSummary};
use cputm_convert::translate::{translate, Translation, TranslateWarning};
use utm_store_core::{write_entities, EntityKind, ALL_KINDS};

use crate::cli::{ConvertArgs, OutputFormat};
use crate::path_guard::ensure_output_not_input;
use crate::resolve_tables;

pub fn run_convert(args: ConvertArgs) -> Result<()> {
    ensure_output_not_input(&args.output, &args.input)?;

    let export = load_export(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    for warning in &export.warnings {
        eprintln!("warning: {warning}");
    }
    let (tables, tables_source) =
        resolve_tables(args.tables_file.as_deref(), args.tables_dir.as_deref());

    let translation = translate(&export, &tables);
    let relinked = relink(&export.rules, &translation.resolved);
    let itemize = matches!(args.format, OutputFormat::Text);

    let mut written = 0usize;
    for kind in ALL_KINDS {
        let bodies = bodies_for_kind(*kind, &translation, &relinked)?;
        if bodies.is_empty() {
            continue;
        }
        if itemize {
            for (name, _) in &bodies {
                println!("+ {kind} {name}");
            }
        }
        let values: Vec<Value> = bodies.into_iter().map(|(_, body)| body).collect();
        let path = args
            .output
            .join(kind.section().as_str())
            .join(kind.file_name());
        write_entities(&path, &values)
            .with_context(|| format!("failed to write {}", path.display()))?;
        written += values.len();
    }
    if written == 0 {
        eprintln!("warning: nothing translated; no files written");
    }

    let summary = summarize(&translation, &relinked);
    match args.format {
        OutputFormat::Text => {
            if !translation.warnings.is_empty() {
                println!("{}", render_translate_warnings(&translation.warnings));
            }
            if !relinked.warnings.is_empty() {
                println!("{}", render_relink_warnings(&relinked.warnings));
            }
            println!("{}", render_skipped(&relinked.skipped));
            println!("{}", render_convert_summary(summary));
        }
        OutputFormat::Json => {
            let report = ConvertReport {
                summary,
                written,
                tables_source: &tables_source,
                unknown_types: &translation.unknown,
                translate_warnings: &translation.warnings,
                relink_warnings: &relinked.warnings,
                skipped: &relinked.skipped,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Serialized bodies for one kind, paired with their names for the
/// progress listing.
fn bodies_for_kind(
    kind: EntityKind,
    translation: &Translation,
    relinked: &Relinked,
) -> Result<Vec<(String, Value)>> {
    let mut bodies = Vec::new();
    match kind {
        EntityKind::FirewallRules => {
            for rule in &relinked.firewall {
                bodies.push((rule.name.clone(), serde_json::to_value(rule)?));
            }
        }
        EntityKind::ContentRules => {
            for rule in &relinked.content {
                bodies.push((rule.name.clone(), serde_json::to_value(rule)?));
            }
        }
        EntityKind::DosRules => {
            for rule in &relinked.dos {
                bodies.push((rule.name.clone(), serde_json::to_value(rule)?));
            }
        }
        _ => {
            for entity in translation.entities.iter().filter(|e| e.kind() == kind) {
                bodies.push((entity.name().to_string(), serde_json::to_value(entity)?));
            }
        }
    }
    Ok(bodies)
}

#[derive(Debug, Serialize)]
struct ConvertReport<'a> {
    summary: ConversionSummary,
    written: usize,
    tables_source: &'a str,
    unknown_types: &'a [String],
    translate_warnings: &'a [TranslateWarning],
    relink_warnings: &'a [RelinkWarning],
    skipped: &'a [SkippedRule],
}
