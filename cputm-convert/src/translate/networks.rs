//! Address translation: hosts, networks and ranges become one-entry IP
//! lists; network groups concatenate the items of their member lists.

use utm_store_core::{EntityKind, ListType, NamedList};

use crate::resolve::Resolved;
use crate::sanitize::sanitize_name;
use crate::source::{Export, ForeignKind, ForeignObject};
use crate::translate::{description_of, EntityBody, Translation};

pub(super) fn translate_address_leaves(export: &Export, out: &mut Translation) {
    for object in export.objects.values() {
        let item = match object.kind {
            ForeignKind::Host => host_item(object),
            ForeignKind::Network => network_item(object),
            ForeignKind::AddressRange => range_item(object),
            _ => continue,
        };
        let Some(item) = item else {
            out.warn(
                "missing-address",
                format!("{} '{}' carries no usable address", object.kind, object.name),
            );
            out.bind(&object.uid, Resolved::Unsupported);
            continue;
        };
        push_ip_list(object, vec![item], out);
    }
}

/// IPv4 address preferred, IPv6 accepted.
fn host_item(object: &ForeignObject) -> Option<String> {
    object
        .attr_str("ipv4-address")
        .or_else(|| object.attr_str("ipv6-address"))
        .filter(|addr| !addr.is_empty())
        .map(str::to_string)
}

fn network_item(object: &ForeignObject) -> Option<String> {
    let v4 = object
        .attr_str("subnet4")
        .filter(|s| !s.is_empty())
        .zip(object.attr_text("mask-length4"));
    let v6 = object
        .attr_str("subnet6")
        .filter(|s| !s.is_empty())
        .zip(object.attr_text("mask-length6"));
    v4.or(v6).map(|(subnet, bits)| format!("{subnet}/{bits}"))
}

fn range_item(object: &ForeignObject) -> Option<String> {
    let v4 = object
        .attr_str("ipv4-address-first")
        .filter(|a| !a.is_empty())
        .zip(object.attr_str("ipv4-address-last").filter(|a| !a.is_empty()));
    let v6 = object
        .attr_str("ipv6-address-first")
        .filter(|a| !a.is_empty())
        .zip(object.attr_str("ipv6-address-last").filter(|a| !a.is_empty()));
    v4.or(v6).map(|(first, last)| format!("{first}-{last}"))
}

/// Network groups concatenate the items of their already-translated member
/// lists, in member order. Same fixpoint discipline as service groups.
pub(super) fn translate_network_groups(export: &Export, out: &mut Translation) {
    let mut remaining: Vec<&ForeignObject> = export
        .objects
        .values()
        .filter(|object| object.kind == ForeignKind::NetworkGroup)
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

fn members_ready(group: &ForeignObject, export: &Export, out: &Translation) -> bool {
    group.attr_strings("members").iter().all(|uid| {
        out.resolved.contains(uid)
            || !matches!(
                export.get(uid).map(|member| &member.kind),
                Some(ForeignKind::NetworkGroup)
            )
    })
}

fn translate_group(group: &ForeignObject, export: &Export, out: &mut Translation) {
    let mut items = Vec::new();
    for uid in group.attr_strings("members") {
        match member_items(uid, out) {
            Some(found) => items.extend(found),
            None => {
                let member = export
                    .get(uid)
                    .map(|m| format!("{} '{}'", m.kind, m.name))
                    .unwrap_or_else(|| format!("uid {uid}"));
                out.warn(
                    "unresolved-member",
                    format!(
                        "network group '{}' member {member} contributes no addresses, skipped",
                        group.name
                    ),
                );
            }
        }
    }

    if items.is_empty() {
        out.warn(
            "empty-group",
            format!("network group '{}' has no translatable members", group.name),
        );
        out.bind(&group.uid, Resolved::Unsupported);
        return;
    }
    push_ip_list(group, items, out);
}

fn member_items(uid: &str, out: &Translation) -> Option<Vec<String>> {
    let Resolved::Entity { kind, name } = out.resolved.get(uid)? else {
        return None;
    };
    if *kind != EntityKind::IpLists {
        return None;
    }
    match out.entity(EntityKind::IpLists, name)? {
        EntityBody::List(list) => Some(list.items.clone()),
        _ => None,
    }
}

fn push_ip_list(object: &ForeignObject, items: Vec<String>, out: &mut Translation) {
    let name = sanitize_name(&object.name);
    out.push_entity(EntityBody::List(NamedList {
        name: name.clone(),
        description: description_of(object),
        list_type: ListType::Ip,
        items,
    }));
    out.bind(&object.uid, Resolved::entity(EntityKind::IpLists, name));
}
