//! The store seam: every backend (in-memory, directory snapshot, or a real
//! appliance transport) exposes the same create/update/list surface and
//! reports failures as fault values, never as panics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::kind::EntityKind;

/// Create refused: an entity with the same name already exists.
pub const FAULT_ALREADY_EXISTS: u16 = 409;
/// Update refused: no entity with the given id.
pub const FAULT_NOT_FOUND: u16 = 404;
/// Update refused: the stored body already matches, nothing to change.
pub const FAULT_UNCHANGED: u16 = 304;
/// Operation refused: the body is not a usable entity (no name).
pub const FAULT_INVALID: u16 = 400;

/// Fault value returned by a failed store operation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("store fault {code}: {message}")]
pub struct StoreFault {
    pub code: u16,
    pub message: String,
}

impl StoreFault {
    pub fn already_exists(name: &str) -> StoreFault {
        StoreFault {
            code: FAULT_ALREADY_EXISTS,
            message: format!("an entity named '{name}' already exists"),
        }
    }

    pub fn not_found(id: &str) -> StoreFault {
        StoreFault {
            code: FAULT_NOT_FOUND,
            message: format!("no entity with id '{id}'"),
        }
    }

    pub fn unchanged(id: &str) -> StoreFault {
        StoreFault {
            code: FAULT_UNCHANGED,
            message: format!("entity '{id}' has no differing parameters"),
        }
    }

    pub fn invalid(detail: &str) -> StoreFault {
        StoreFault {
            code: FAULT_INVALID,
            message: detail.to_string(),
        }
    }

    pub fn is_already_exists(&self) -> bool {
        self.code == FAULT_ALREADY_EXISTS
    }

    pub fn is_unchanged(&self) -> bool {
        self.code == FAULT_UNCHANGED
    }
}

/// Store of appliance configuration objects, one collection per kind.
///
/// Names are the natural key: `create` refuses a taken name with fault 409,
/// and the importer is expected to follow up with `update` on the id it finds
/// in `list`. Name comparison is case-insensitive, matching the appliance.
pub trait ObjectStore {
    /// Inventory of one collection as entity name → store id.
    fn list(&self, kind: EntityKind) -> BTreeMap<String, String>;

    /// Add a new entity and return its id.
    fn create(&mut self, kind: EntityKind, body: &Value) -> Result<String, StoreFault>;

    /// Replace the entity behind `id` and return the id.
    ///
    /// Faults: 404 for an unknown id, 304 when the stored body already
    /// equals `body`, 409 when the update would rename onto a taken name.
    fn update(&mut self, kind: EntityKind, id: &str, body: &Value) -> Result<String, StoreFault>;

    /// Fetch one entity body by id.
    fn get(&self, kind: EntityKind, id: &str) -> Option<Value>;
}

/// Extract the natural key from an entity body.
pub fn entity_name(body: &Value) -> Option<&str> {
    body.get("name").and_then(Value::as_str)
}
