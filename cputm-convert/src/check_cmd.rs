use anyhow::{Context, Result};
use cputm_convert::check::{build_check_report, render_check_text};
use cputm_convert::source::load_export;

use crate::cli::{CheckArgs, OutputFormat};
use crate::resolve_tables;

pub fn run_check(args: CheckArgs) -> Result<()> {
    let export = load_export(&args.file)
        .with_context(|| format!("failed to load {}", args.file.display()))?;
    let (tables, tables_source) =
        resolve_tables(args.tables_file.as_deref(), args.tables_dir.as_deref());
    let report = build_check_report(&export, &tables, &tables_source);

    match args.format {
        OutputFormat::Text => println!("{}", render_check_text(&report, args.verbose)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
