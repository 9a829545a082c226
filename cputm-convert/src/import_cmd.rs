use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use cputm_convert::import::import_all;
use cputm_convert::report::render_import_text;
use utm_store_core::{read_entities, DirStore, EntityKind, ALL_KINDS};

use crate::cli::{ImportArgs, OutputFormat};

pub fn run_import(args: ImportArgs) -> Result<()> {
    let mut store = DirStore::open(&args.target)
        .with_context(|| format!("failed to open target store {}", args.target.display()))?;

    let batches = read_import_tree(&args.source);
    if batches.is_empty() {
        bail!("no import files found under {}", args.source.display());
    }

    let report = import_all(&mut store, &batches);
    store
        .save()
        .with_context(|| format!("failed to save target store {}", args.target.display()))?;

    match args.format {
        OutputFormat::Text => println!("{}", render_import_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if args.strict && !report.is_clean() {
        bail!(
            "import failed in strict mode: {} entities failed",
            report.failed()
        );
    }
    Ok(())
}

/// Collect per-kind entity batches from an import tree, in tree order.
/// Absent files are normal; an unreadable file skips that kind with a
/// warning and its siblings still run.
fn read_import_tree(root: &Path) -> Vec<(EntityKind, Vec<Value>)> {
    let mut batches = Vec::new();
    for kind in ALL_KINDS {
        let path = root.join(kind.section().as_str()).join(kind.file_name());
        if !path.exists() {
            continue;
        }
        match read_entities(&path) {
            Ok(entities) => batches.push((*kind, entities)),
            Err(err) => eprintln!("warning: skipping {kind}: {err}"),
        }
    }
    batches
}
