//! Idempotent importer: pushes converted entities into an object store,
//! creating what is new and updating what already exists.
//!
//! Each entity settles in one pass with no retries. A create that faults
//! with a name conflict falls back to an update through the inventoried id;
//! an update the store reports as unchanged becomes a no-op. Failures are
//! recorded per entity and never stop the batch.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use utm_store_core::{entity_name, EntityKind, ObjectStore};

/// Where one entity ended up. Every entity gets exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImportStatus {
    Created { id: String },
    Updated { id: String },
    NoOpAlreadyCurrent { id: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub kind: EntityKind,
    pub name: String,
    #[serde(flatten)]
    pub status: ImportStatus,
}

/// Outcomes for a whole run, in submission order.
#[derive(Debug, Default, Serialize)]
pub struct ImportReport {
    pub outcomes: Vec<ImportOutcome>,
}

impl ImportReport {
    pub fn created(&self) -> usize {
        self.count(|status| matches!(status, ImportStatus::Created { .. }))
    }

    pub fn updated(&self) -> usize {
        self.count(|status| matches!(status, ImportStatus::Updated { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|status| matches!(status, ImportStatus::NoOpAlreadyCurrent { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, ImportStatus::Failed { .. }))
    }

    pub fn failures(&self) -> impl Iterator<Item = &ImportOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.status, ImportStatus::Failed { .. }))
    }

    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pick: impl Fn(&ImportStatus) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| pick(&outcome.status))
            .count()
    }
}

/// Name-to-id lookup tables for the kinds a run will touch, fetched before
/// any write happens.
pub fn load_inventory(
    store: &dyn ObjectStore,
    kinds: &[EntityKind],
) -> BTreeMap<EntityKind, BTreeMap<String, String>> {
    kinds.iter().map(|kind| (*kind, store.list(*kind))).collect()
}

/// Import batches kind by kind, in the order given.
pub fn import_all(
    store: &mut dyn ObjectStore,
    batches: &[(EntityKind, Vec<Value>)],
) -> ImportReport {
    let kinds: Vec<EntityKind> = batches.iter().map(|(kind, _)| *kind).collect();
    let mut inventories = load_inventory(store, &kinds);
    let mut report = ImportReport::default();
    for (kind, entities) in batches {
        let inventory = inventories.entry(*kind).or_default();
        report
            .outcomes
            .extend(import_kind(store, *kind, entities, inventory));
    }
    report
}

/// Import one kind's entities against an inventory from [`load_inventory`].
pub fn import_kind(
    store: &mut dyn ObjectStore,
    kind: EntityKind,
    entities: &[Value],
    inventory: &mut BTreeMap<String, String>,
) -> Vec<ImportOutcome> {
    let mut outcomes = Vec::new();
    for body in entities {
        let Some(name) = entity_name(body) else {
            outcomes.push(ImportOutcome {
                kind,
                name: "(unnamed)".to_string(),
                status: ImportStatus::Failed {
                    reason: "entity body has no name field".to_string(),
                },
            });
            continue;
        };
        let name = name.to_string();
        let status = upsert(store, kind, &name, body, inventory);
        outcomes.push(ImportOutcome { kind, name, status });
    }
    outcomes
}

/// The inventory is kept live so later entities in the same batch see what
/// earlier ones created.
fn upsert(
    store: &mut dyn ObjectStore,
    kind: EntityKind,
    name: &str,
    body: &Value,
    inventory: &mut BTreeMap<String, String>,
) -> ImportStatus {
    match store.create(kind, body) {
        Ok(id) => {
            inventory.insert(name.to_string(), id.clone());
            ImportStatus::Created { id }
        }
        Err(fault) if fault.is_already_exists() => {
            let Some(id) = inventoried_id(inventory, name) else {
                return ImportStatus::Failed {
                    reason: format!("name is taken but missing from the inventory: {fault}"),
                };
            };
            match store.update(kind, &id, body) {
                Ok(id) => ImportStatus::Updated { id },
                Err(fault) if fault.is_unchanged() => ImportStatus::NoOpAlreadyCurrent { id },
                Err(fault) => ImportStatus::Failed {
                    reason: fault.to_string(),
                },
            }
        }
        Err(fault) => ImportStatus::Failed {
            reason: fault.to_string(),
        },
    }
}

/// Names match case-insensitively, same as the store's conflict rule.
fn inventoried_id(inventory: &BTreeMap<String, String>, name: &str) -> Option<String> {
    inventory
        .iter()
        .find(|(inventoried, _)| inventoried.eq_ignore_ascii_case(name))
        .map(|(_, id)| id.clone())
}
