//! Entity translator: turns foreign objects into target entities and fills
//! the resolution map the rule relinker reads.
//!
//! # Ordering
//!
//! Translation runs leaves-first, then groups:
//!
//! 1. Service leaves (`service-tcp`, `service-udp`, ICMP built-ins), then
//!    service groups to a fixpoint, so nested groups union protocols that
//!    already exist.
//! 2. Address leaves (`host`, `network`, `address-range`), then network
//!    groups to a fixpoint; a group concatenates the items of lists that are
//!    already translated.
//! 3. URL lists (application sites carrying a `url-list`), before catalog
//!    applications, so a site never double-translates.
//! 4. Catalog applications and URL categories through the dictionaries, then
//!    application groups over resolved application names.
//! 5. Access roles into directory identities.
//! 6. Sentinels: the vendor's Any object, unsupported kinds, and anything
//!    recognized but untranslatable.
//!
//! Objects with an unrecognized `type` are left unbound and untouched; they
//! are reported, never destroyed.
//!
//! # Name conflicts
//!
//! Entity names are compared case-insensitively within a kind. Identical
//! re-translations collapse silently (the well-known port table depends on
//! this); a second entity with the same name and differing contents keeps
//! the first and warns.

mod applications;
mod identity;
mod networks;
mod services;
mod urls;

use std::collections::BTreeMap;

use serde::Serialize;
use utm_store_core::{ApplicationGroup, EntityKind, NamedList, Service};

use crate::resolve::{Resolved, ResolutionMap};
use crate::source::{Export, ForeignKind};
use crate::tables::Tables;

pub use identity::parse_member_tooltip;

/// One entity produced by the translator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntityBody {
    Service(Service),
    List(NamedList),
    Group(ApplicationGroup),
}

impl EntityBody {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityBody::Service(service) => service.kind(),
            EntityBody::List(list) => list.kind(),
            EntityBody::Group(group) => group.kind(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EntityBody::Service(service) => &service.name,
            EntityBody::List(list) => &list.name,
            EntityBody::Group(group) => &group.name,
        }
    }
}

/// Soft problem found while translating; the run always continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslateWarning {
    pub code: String,
    pub message: String,
}

/// Everything one translation run produced.
#[derive(Debug, Default)]
pub struct Translation {
    /// Target entities in emit order; group entities always follow the
    /// leaves they were built from.
    pub entities: Vec<EntityBody>,
    /// Write-once uid bindings.
    pub resolved: ResolutionMap,
    pub warnings: Vec<TranslateWarning>,
    /// Distinct unrecognized `type` strings left untranslated.
    pub unknown: Vec<String>,
    names: BTreeMap<String, usize>,
}

impl Translation {
    pub fn warn(&mut self, code: &str, message: impl Into<String>) {
        self.warnings.push(TranslateWarning {
            code: code.to_string(),
            message: message.into(),
        });
    }

    /// Bind a uid, warning when a second binding is attempted.
    pub fn bind(&mut self, uid: &str, resolved: Resolved) {
        if !self.resolved.bind(uid, resolved) {
            self.warn(
                "duplicate-binding",
                format!("uid {uid} resolved more than once; keeping the first binding"),
            );
        }
    }

    /// Add an entity unless its name is already taken within its kind.
    pub fn push_entity(&mut self, body: EntityBody) {
        let key = entity_key(body.kind(), body.name());
        match self.names.get(&key) {
            None => {
                self.names.insert(key, self.entities.len());
                self.entities.push(body);
            }
            Some(&index) => {
                if self.entities[index] != body {
                    self.warn(
                        "duplicate-name",
                        format!(
                            "{} '{}' translated more than once with differing contents; keeping the first",
                            body.kind(),
                            body.name()
                        ),
                    );
                }
            }
        }
    }

    /// Look an emitted entity up by kind and name.
    pub fn entity(&self, kind: EntityKind, name: &str) -> Option<&EntityBody> {
        self.names
            .get(&entity_key(kind, name))
            .map(|&index| &self.entities[index])
    }
}

fn entity_key(kind: EntityKind, name: &str) -> String {
    format!("{}/{}", kind, name.to_ascii_lowercase())
}

/// Translate every object in the export.
pub fn translate(export: &Export, tables: &Tables) -> Translation {
    let mut out = Translation::default();

    services::translate_service_leaves(export, tables, &mut out);
    services::translate_service_groups(export, &mut out);
    networks::translate_address_leaves(export, &mut out);
    networks::translate_network_groups(export, &mut out);
    urls::translate_url_lists(export, &mut out);
    applications::translate_applications(export, tables, &mut out);
    applications::translate_application_groups(export, &mut out);
    identity::translate_access_roles(export, &mut out);
    bind_sentinels(export, &mut out);

    out.unknown = export.unknown_types();
    out
}

/// Bind everything the family passes left behind.
fn bind_sentinels(export: &Export, out: &mut Translation) {
    for object in export.objects.values() {
        if out.resolved.contains(&object.uid) {
            continue;
        }
        match &object.kind {
            ForeignKind::Any => out.bind(&object.uid, Resolved::Any),
            ForeignKind::Time => {
                out.warn(
                    "time-unsupported",
                    format!(
                        "time object '{}' has no target equivalent; references will be dropped",
                        object.name
                    ),
                );
                out.bind(&object.uid, Resolved::Unsupported);
            }
            ForeignKind::Unknown(_) => {}
            other => {
                out.warn(
                    "untranslated",
                    format!("{} '{}' was not translated", other, object.name),
                );
                out.bind(&object.uid, Resolved::Unsupported);
            }
        }
    }
}

/// Comment field carried over as the entity description.
pub(crate) fn description_of(object: &crate::source::ForeignObject) -> String {
    object.attr_str("comments").unwrap_or_default().to_string()
}
