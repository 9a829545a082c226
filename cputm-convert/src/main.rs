use anyhow::{Context, Result};
use clap::Parser;
use cputm_convert::inspect::{build_inspect_report, render_inspect_text};
use cputm_convert::source::load_export;
use cputm_convert::tables::{default_tables, load_tables, Tables};

mod check_cmd;
mod cli;
mod convert_cmd;
mod import_cmd;
mod path_guard;

use cli::{Cli, Command, InspectArgs, OutputFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Inspect(args) => run_inspect(args),
        Command::Check(args) => check_cmd::run_check(args),
        Command::Convert(args) => convert_cmd::run_convert(args),
        Command::Import(args) => import_cmd::run_import(args),
    }
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let export = load_export(&args.file)
        .with_context(|| format!("failed to load {}", args.file.display()))?;
    for warning in &export.warnings {
        eprintln!("warning: {warning}");
    }

    let report = build_inspect_report(&export, args.kind.as_deref());
    match args.format {
        OutputFormat::Text => print!("{}", render_inspect_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn resolve_tables(
    path: Option<&std::path::Path>,
    tables_dir: Option<&std::path::Path>,
) -> (Tables, String) {
    let chosen = if let Some(path) = path {
        path.to_path_buf()
    } else if let Some(dir) = tables_dir {
        dir.join("tables.toml")
    } else {
        return (default_tables(), "embedded".to_string());
    };

    match load_tables(&chosen) {
        Ok(tables) => (tables, format!("file:{}", chosen.display())),
        Err(err) => {
            eprintln!(
                "warning: failed to load tables from {} ({err}); using embedded defaults",
                chosen.display()
            );
            (default_tables(), "embedded".to_string())
        }
    }
}
