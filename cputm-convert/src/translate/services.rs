//! Service translation: protocol/port leaves, ICMP built-ins and service
//! groups.

use std::collections::BTreeSet;

use utm_store_core::{EntityKind, Protocol, ProtocolEntry, Service};

use crate::resolve::Resolved;
use crate::sanitize::sanitize_name;
use crate::source::{Export, ForeignKind, ForeignObject};
use crate::tables::Tables;
use crate::translate::{description_of, EntityBody, Translation};

pub(super) fn translate_service_leaves(export: &Export, tables: &Tables, out: &mut Translation) {
    for object in export.objects.values() {
        match object.kind {
            ForeignKind::ServiceTcp => leaf(object, Protocol::Tcp, tables, out),
            ForeignKind::ServiceUdp => leaf(object, Protocol::Udp, tables, out),
            ForeignKind::ServiceIcmp => builtin(object, "Any ICMP", out),
            ForeignKind::ServiceIcmp6 => builtin(object, "Any IPV6-ICMP", out),
            _ => {}
        }
    }
}

/// One `service-tcp` / `service-udp` object.
///
/// A port found in the well-known table collapses onto the catalog name with
/// a canonical single-protocol body, so repeated hits dedup to one entity. A
/// miss keeps the source name (sanitized) and the source-port qualifier.
fn leaf(object: &ForeignObject, protocol: Protocol, tables: &Tables, out: &mut Translation) {
    let Some(port) = object.attr_text("port").filter(|p| !p.is_empty()) else {
        out.warn(
            "missing-port",
            format!("{} '{}' has no port", object.kind, object.name),
        );
        out.bind(&object.uid, Resolved::Unsupported);
        return;
    };
    let source_port = object.attr_text("source-port").filter(|p| !p.is_empty());

    if let Some(known) = tables.service_name(protocol, &port) {
        if source_port.is_some() {
            out.warn(
                "source-port-dropped",
                format!(
                    "'{}' collapses onto catalog service '{known}'; its source port does not carry over",
                    object.name
                ),
            );
        }
        out.push_entity(EntityBody::Service(Service {
            name: known.to_string(),
            description: String::new(),
            protocols: vec![ProtocolEntry {
                protocol,
                port,
                source_port: None,
            }],
        }));
        out.bind(&object.uid, Resolved::entity(EntityKind::Services, known));
        return;
    }

    let name = sanitize_name(&object.name);
    out.push_entity(EntityBody::Service(Service {
        name: name.clone(),
        description: description_of(object),
        protocols: vec![ProtocolEntry {
            protocol,
            port,
            source_port,
        }],
    }));
    out.bind(&object.uid, Resolved::entity(EntityKind::Services, name));
}

/// ICMP services resolve to target built-ins; no entity is emitted.
fn builtin(object: &ForeignObject, name: &str, out: &mut Translation) {
    out.bind(&object.uid, Resolved::entity(EntityKind::Services, name));
}

/// Service groups become services whose protocol list is the union of their
/// members', deduplicated by exact protocol/port/source-port entry.
///
/// Groups run to a fixpoint so nesting works regardless of uid order; a
/// cycle (an export defect) is broken by translating the remaining groups
/// with whatever members are resolvable at that point.
pub(super) fn translate_service_groups(export: &Export, out: &mut Translation) {
    let mut remaining: Vec<&ForeignObject> = export
        .objects
        .values()
        .filter(|object| object.kind == ForeignKind::ServiceGroup)
        .collect();

    while !remaining.is_empty() {
        let mut deferred = Vec::new();
        let mut progressed = false;
        for group in remaining {
            if members_ready(group, export, out) {
                translate_group(group, export, out);
                progressed = true;
            } else {
                deferred.push(group);
            }
        }
        if !progressed {
            for group in &deferred {
                translate_group(group, export, out);
            }
            break;
        }
        remaining = deferred;
    }
}

/// A group is ready once no member is a still-untranslated service group.
fn members_ready(group: &ForeignObject, export: &Export, out: &Translation) -> bool {
    group.attr_strings("members").iter().all(|uid| {
        out.resolved.contains(uid)
            || !matches!(
                export.get(uid).map(|member| &member.kind),
                Some(ForeignKind::ServiceGroup)
            )
    })
}

fn translate_group(group: &ForeignObject, export: &Export, out: &mut Translation) {
    let mut protocols = BTreeSet::new();
    for uid in group.attr_strings("members") {
        match member_protocols(uid, out) {
            Some(entries) => protocols.extend(entries),
            None => {
                let member = export
                    .get(uid)
                    .map(|m| format!("{} '{}'", m.kind, m.name))
                    .unwrap_or_else(|| format!("uid {uid}"));
                out.warn(
                    "unresolved-member",
                    format!(
                        "service group '{}' member {member} contributes no protocols, skipped",
                        group.name
                    ),
                );
            }
        }
    }

    if protocols.is_empty() {
        out.warn(
            "empty-group",
            format!("service group '{}' has no translatable members", group.name),
        );
        out.bind(&group.uid, Resolved::Unsupported);
        return;
    }

    let name = sanitize_name(&group.name);
    out.push_entity(EntityBody::Service(Service {
        name: name.clone(),
        description: description_of(group),
        protocols: protocols.into_iter().collect(),
    }));
    out.bind(&group.uid, Resolved::entity(EntityKind::Services, name));
}

/// Protocol entries a member contributes to its group's union.
fn member_protocols(uid: &str, out: &Translation) -> Option<Vec<ProtocolEntry>> {
    let Resolved::Entity { kind, name } = out.resolved.get(uid)? else {
        return None;
    };
    if *kind != EntityKind::Services {
        return None;
    }
    match out.entity(EntityKind::Services, name)? {
        EntityBody::Service(service) => Some(service.protocols.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::tables::default_tables;
    use crate::translate::translate;

    fn export_from(value: serde_json::Value) -> Export {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();
        crate::source::load_export(&path).unwrap()
    }

    fn service<'t>(translation: &'t Translation, name: &str) -> &'t Service {
        match translation.entity(EntityKind::Services, name) {
            Some(EntityBody::Service(service)) => service,
            _ => panic!("service '{name}' not emitted"),
        }
    }

    #[test]
    fn group_unions_member_protocols_without_duplicates() {
        let export = export_from(json!([
            {"uid": "s1", "type": "service-tcp", "name": "web-80", "port": "80"},
            {"uid": "s2", "type": "service-tcp", "name": "web-443", "port": "443"},
            {"uid": "s3", "type": "service-tcp", "name": "also-443", "port": "443"},
            {"uid": "g1", "type": "service-group", "name": "web", "members": ["s1", "s2", "s3"]},
        ]));
        let translation = translate(&export, &default_tables());

        let group = service(&translation, "web");
        let ports: Vec<&str> = group.protocols.iter().map(|p| p.port.as_str()).collect();
        assert_eq!(ports, vec!["443", "80"]);
    }

    #[test]
    fn nested_groups_resolve_regardless_of_uid_order() {
        let export = export_from(json!([
            {"uid": "a-outer", "type": "service-group", "name": "outer", "members": ["z-inner"]},
            {"uid": "m1", "type": "service-udp", "name": "metrics", "port": "9125"},
            {"uid": "z-inner", "type": "service-group", "name": "inner", "members": ["m1"]},
        ]));
        let translation = translate(&export, &default_tables());

        let outer = service(&translation, "outer");
        assert_eq!(outer.protocols.len(), 1);
        assert_eq!(outer.protocols[0].port, "9125");
        assert_eq!(
            translation.resolved.get("a-outer"),
            Some(&Resolved::entity(EntityKind::Services, "outer"))
        );
    }

    #[test]
    fn icmp_members_are_skipped_with_a_warning() {
        let export = export_from(json!([
            {"uid": "p1", "type": "service-icmp", "name": "echo-request"},
            {"uid": "s1", "type": "service-tcp", "name": "probe", "port": "7777"},
            {"uid": "g1", "type": "service-group", "name": "diag", "members": ["p1", "s1"]},
        ]));
        let translation = translate(&export, &default_tables());

        let group = service(&translation, "diag");
        assert_eq!(group.protocols.len(), 1);
        assert!(translation
            .warnings
            .iter()
            .any(|w| w.code == "unresolved-member"));
    }

    #[test]
    fn dangling_member_leaves_the_group_usable() {
        let export = export_from(json!([
            {"uid": "s1", "type": "service-tcp", "name": "app", "port": "8000"},
            {"uid": "g1", "type": "service-group", "name": "apps", "members": ["s1", "gone"]},
        ]));
        let translation = translate(&export, &default_tables());

        assert_eq!(service(&translation, "apps").protocols.len(), 1);
    }

    #[test]
    fn group_of_nothing_translatable_is_unsupported() {
        let export = export_from(json!([
            {"uid": "g1", "type": "service-group", "name": "hollow", "members": ["gone"]},
        ]));
        let translation = translate(&export, &default_tables());

        assert_eq!(translation.resolved.get("g1"), Some(&Resolved::Unsupported));
        assert!(translation.entity(EntityKind::Services, "hollow").is_none());
    }

    #[test]
    fn cyclic_groups_still_terminate() {
        let export = export_from(json!([
            {"uid": "g1", "type": "service-group", "name": "ouro", "members": ["g2"]},
            {"uid": "g2", "type": "service-group", "name": "boros", "members": ["g1"]},
            {"uid": "s1", "type": "service-tcp", "name": "seed", "port": "9000"},
        ]));
        let translation = translate(&export, &default_tables());

        assert!(translation.resolved.contains("g1"));
        assert!(translation.resolved.contains("g2"));
    }

    #[test]
    fn icmp6_uses_the_v6_builtin() {
        let export = export_from(json!([
            {"uid": "p6", "type": "service-icmp6", "name": "neighbor-discovery"},
        ]));
        let translation = translate(&export, &default_tables());
        assert_eq!(
            translation.resolved.get("p6"),
            Some(&Resolved::entity(EntityKind::Services, "Any IPV6-ICMP"))
        );
    }
}
