//! The resolution map: a write-once record of what each foreign uid became.
//!
//! The translator fills it, the rule relinker reads it. Once a uid is bound,
//! every consumer uses the binding and never the foreign object's fields.

use std::collections::BTreeMap;

use serde::Serialize;
use utm_store_core::{EntityKind, IdentityMember};

/// What a foreign uid resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "resolution", rename_all = "snake_case")]
pub enum Resolved {
    /// A named target entity (service, named list, application group).
    Entity { kind: EntityKind, name: String },
    /// A built-in URL category.
    Category { name: String },
    /// A catalog application.
    Application { name: String },
    /// Directory identities from an access role.
    Identity { members: Vec<IdentityMember> },
    /// Matches anything; rule fields drop this entry.
    Any,
    /// Known kind with no target mapping; rule fields drop this entry.
    Unsupported,
}

impl Resolved {
    pub fn entity(kind: EntityKind, name: impl Into<String>) -> Resolved {
        Resolved::Entity {
            kind,
            name: name.into(),
        }
    }
}

/// Uid -> [`Resolved`] bindings, first binding wins.
#[derive(Debug, Default)]
pub struct ResolutionMap {
    bindings: BTreeMap<String, Resolved>,
}

impl ResolutionMap {
    pub fn new() -> ResolutionMap {
        ResolutionMap::default()
    }

    /// Bind a uid. Returns `false` when the uid was already bound; the
    /// earlier binding stays and the caller is expected to warn.
    pub fn bind(&mut self, uid: &str, resolved: Resolved) -> bool {
        if self.bindings.contains_key(uid) {
            return false;
        }
        self.bindings.insert(uid.to_string(), resolved);
        true
    }

    pub fn get(&self, uid: &str) -> Option<&Resolved> {
        self.bindings.get(uid)
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.bindings.contains_key(uid)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
