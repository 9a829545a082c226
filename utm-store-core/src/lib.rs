//! Typed entity schema and object-store backends for UTM appliance
//! configuration, shared by higher-level conversion tools.

pub mod dir_store;
pub mod files;
pub mod kind;
pub mod memory;
pub mod schema;
pub mod store;

pub use dir_store::{DirStore, SnapshotError};
pub use files::{read_entities, write_entities, FilesError};
pub use kind::{EntityKind, TreeSection, ALL_KINDS};
pub use memory::MemoryStore;
pub use schema::{
    ApplicationGroup, ContentRule, DosRule, FirewallRule, IdentityKind, IdentityMember, ListType,
    NamedList, Protocol, ProtocolEntry, RuleAction, RuleRef, Service,
};
pub use store::{
    entity_name, ObjectStore, StoreFault, FAULT_ALREADY_EXISTS, FAULT_INVALID, FAULT_NOT_FOUND,
    FAULT_UNCHANGED,
};
