//! In-memory [`ObjectStore`] used by tests and as the working set behind the
//! directory snapshot store.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::kind::EntityKind;
use crate::store::{entity_name, ObjectStore, StoreFault};

/// Object store holding every collection in memory.
///
/// Ids are `kind:sequence` strings, assigned in creation order and never
/// reused within one store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: BTreeMap<EntityKind, Collection>,
}

#[derive(Debug, Default)]
struct Collection {
    entities: BTreeMap<u64, Value>,
    next_seq: u64,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// All bodies of one collection, in id order.
    pub fn entities(&self, kind: EntityKind) -> Vec<Value> {
        self.collections
            .get(&kind)
            .map(|c| c.entities.values().cloned().collect())
            .unwrap_or_default()
    }

    fn seq_of(kind: EntityKind, id: &str) -> Option<u64> {
        let raw = id.strip_prefix(kind.as_str())?.strip_prefix(':')?;
        raw.parse().ok()
    }

    fn format_id(kind: EntityKind, seq: u64) -> String {
        format!("{}:{}", kind.as_str(), seq)
    }
}

impl ObjectStore for MemoryStore {
    fn list(&self, kind: EntityKind) -> BTreeMap<String, String> {
        let Some(collection) = self.collections.get(&kind) else {
            return BTreeMap::new();
        };
        collection
            .entities
            .iter()
            .filter_map(|(seq, body)| {
                entity_name(body).map(|name| (name.to_string(), Self::format_id(kind, *seq)))
            })
            .collect()
    }

    fn create(&mut self, kind: EntityKind, body: &Value) -> Result<String, StoreFault> {
        let Some(name) = entity_name(body) else {
            return Err(StoreFault::invalid("entity body has no name"));
        };
        let collection = self.collections.entry(kind).or_default();
        let taken = collection
            .entities
            .values()
            .filter_map(entity_name)
            .any(|existing| existing.eq_ignore_ascii_case(name));
        if taken {
            return Err(StoreFault::already_exists(name));
        }
        collection.next_seq += 1;
        let seq = collection.next_seq;
        collection.entities.insert(seq, body.clone());
        Ok(Self::format_id(kind, seq))
    }

    fn update(&mut self, kind: EntityKind, id: &str, body: &Value) -> Result<String, StoreFault> {
        let Some(name) = entity_name(body) else {
            return Err(StoreFault::invalid("entity body has no name"));
        };
        let Some(seq) = Self::seq_of(kind, id) else {
            return Err(StoreFault::not_found(id));
        };
        let Some(collection) = self.collections.get_mut(&kind) else {
            return Err(StoreFault::not_found(id));
        };
        if !collection.entities.contains_key(&seq) {
            return Err(StoreFault::not_found(id));
        }
        if collection.entities[&seq] == *body {
            return Err(StoreFault::unchanged(id));
        }
        let renamed_onto_taken = collection
            .entities
            .iter()
            .filter(|(other, _)| **other != seq)
            .filter_map(|(_, other_body)| entity_name(other_body))
            .any(|existing| existing.eq_ignore_ascii_case(name));
        if renamed_onto_taken {
            return Err(StoreFault::already_exists(name));
        }
        collection.entities.insert(seq, body.clone());
        Ok(id.to_string())
    }

    fn get(&self, kind: EntityKind, id: &str) -> Option<Value> {
        let seq = Self::seq_of(kind, id)?;
        self.collections.get(&kind)?.entities.get(&seq).cloned()
    }
}
