//! Directory-tree snapshot backend for [`ObjectStore`].
//!
//! The on-disk layout is the documented interchange tree: one JSON array
//! file per kind under `library/`, `network/` and `security/`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::files::{read_entities, write_entities, FilesError};
use crate::kind::{EntityKind, ALL_KINDS};
use crate::memory::MemoryStore;
use crate::store::{ObjectStore, StoreFault};

/// Errors opening or saving a snapshot tree.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Files(#[from] FilesError),
    #[error("snapshot entity rejected in {path}: {fault}")]
    Load { path: String, fault: StoreFault },
}

/// [`ObjectStore`] over a directory snapshot of the configuration tree.
///
/// Collections load into memory on open; nothing touches disk again until
/// [`DirStore::save`] writes every collection back.
#[derive(Debug)]
pub struct DirStore {
    root: PathBuf,
    inner: MemoryStore,
}

impl DirStore {
    /// Open a snapshot directory.
    ///
    /// A missing kind file is an empty collection; a missing root is an
    /// empty store, created on the first `save`.
    pub fn open(root: &Path) -> Result<DirStore, SnapshotError> {
        let mut inner = MemoryStore::new();
        for kind in ALL_KINDS {
            let path = Self::kind_path(root, *kind);
            if !path.exists() {
                continue;
            }
            for body in read_entities(&path)? {
                inner
                    .create(*kind, &body)
                    .map_err(|fault| SnapshotError::Load {
                        path: path.display().to_string(),
                        fault,
                    })?;
            }
        }
        Ok(DirStore {
            root: root.to_path_buf(),
            inner,
        })
    }

    /// Write every collection back under the root.
    ///
    /// A kind with no entities and no existing file stays absent.
    pub fn save(&self) -> Result<(), SnapshotError> {
        for kind in ALL_KINDS {
            let path = Self::kind_path(&self.root, *kind);
            let entities = self.inner.entities(*kind);
            if entities.is_empty() && !path.exists() {
                continue;
            }
            write_entities(&path, &entities)?;
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn kind_path(root: &Path, kind: EntityKind) -> PathBuf {
        root.join(kind.section().as_str()).join(kind.file_name())
    }
}

impl ObjectStore for DirStore {
    fn list(&self, kind: EntityKind) -> BTreeMap<String, String> {
        self.inner.list(kind)
    }

    fn create(&mut self, kind: EntityKind, body: &Value) -> Result<String, StoreFault> {
        self.inner.create(kind, body)
    }

    fn update(&mut self, kind: EntityKind, id: &str, body: &Value) -> Result<String, StoreFault> {
        self.inner.update(kind, id, body)
    }

    fn get(&self, kind: EntityKind, id: &str) -> Option<Value> {
        self.inner.get(kind, id)
    }
}
