//! Read and write entity collection files: one JSON array of entity bodies
//! per file, pretty-printed for diff-friendly snapshots.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Errors returned when reading or writing entity collection files.
#[derive(Debug, Error)]
pub enum FilesError {
    #[error("failed to read entity file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse entity file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("entity file {path} is not a JSON array")]
    NotAnArray { path: String },
    #[error("failed to serialize entities for {path}: {source}")]
    Serialize {
        path: String,
        source: serde_json::Error,
    },
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write entity file {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Read one entity collection file.
pub fn read_entities(path: &Path) -> Result<Vec<Value>, FilesError> {
    let raw = fs::read_to_string(path).map_err(|source| FilesError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let parsed: Value = serde_json::from_str(&raw).map_err(|source| FilesError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    match parsed {
        Value::Array(entities) => Ok(entities),
        _ => Err(FilesError::NotAnArray {
            path: path.display().to_string(),
        }),
    }
}

/// Write one entity collection file, creating parent directories as needed.
pub fn write_entities(path: &Path, entities: &[Value]) -> Result<(), FilesError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| FilesError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }
    }
    let rendered = serde_json::to_string_pretty(entities).map_err(|source| FilesError::Serialize {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, rendered + "\n").map_err(|source| FilesError::Write {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn round_trips_an_entity_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library").join("services.json");
        let entities = vec![json!({"name": "SSH"}), json!({"name": "HTTP"})];

        write_entities(&path, &entities).unwrap();
        assert_eq!(read_entities(&path).unwrap(), entities);
    }

    #[test]
    fn rejects_non_array_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("services.json");
        fs::write(&path, "{\"name\": \"SSH\"}").unwrap();

        let err = read_entities(&path).unwrap_err();
        assert!(matches!(err, FilesError::NotAnArray { .. }));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = read_entities(&path).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }
}
