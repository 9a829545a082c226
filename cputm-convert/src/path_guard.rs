use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Refuse to write the import tree over the export it came from.
pub fn ensure_output_not_input(output: &Path, input: &Path) -> Result<()> {
    if output.is_file() {
        bail!(
            "output {} is an existing file; convert writes a directory tree",
            output.display()
        );
    }

    let out_norm = normalize_for_compare(output)
        .with_context(|| format!("failed to normalize output path {}", output.display()))?;
    let in_norm = normalize_for_compare(input)
        .with_context(|| format!("failed to normalize input path {}", input.display()))?;
    if out_norm == in_norm {
        bail!(
            "refusing to overwrite source file: output {} matches input {}",
            output.display(),
            input.display()
        );
    }
    Ok(())
}

fn normalize_for_compare(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        // canonicalize resolves symlinks and `..` for paths that exist on disk.
        return path
            .canonicalize()
            .with_context(|| format!("canonicalize {}", path.display()));
    }

    // The output directory usually does not exist yet, so fall back to a
    // cwd join. `..` sequences are not resolved on this path; both paths
    // come from the same operator's command line.
    let base = if path.is_absolute() {
        PathBuf::new()
    } else {
        std::env::current_dir().context("current_dir")?
    };

    Ok(base.join(path))
}
