//! Application and category translation through the dictionaries, plus
//! application groups.
//!
//! Dictionary misses are reported and bound to the unsupported sentinel; a
//! silently dropped name would surface only as a rule that stopped matching.

use utm_store_core::{ApplicationGroup, EntityKind};

use crate::resolve::Resolved;
use crate::sanitize::sanitize_name;
use crate::source::{Export, ForeignKind};
use crate::tables::Tables;
use crate::translate::{description_of, urls, EntityBody, Translation};

pub(super) fn translate_applications(export: &Export, tables: &Tables, out: &mut Translation) {
    for object in export.objects.values() {
        match object.kind {
            ForeignKind::ApplicationSite => {
                if !urls::site_urls(object).is_empty() {
                    continue;
                }
                match tables.application(&object.name) {
                    Some(target) => {
                        out.bind(&object.uid, Resolved::Application {
                            name: target.to_string(),
                        });
                    }
                    None => {
                        out.warn(
                            "unmapped-application",
                            format!(
                                "application '{}' is not in the application dictionary",
                                object.name
                            ),
                        );
                        out.bind(&object.uid, Resolved::Unsupported);
                    }
                }
            }
            ForeignKind::ApplicationSiteCategory => match tables.url_category(&object.name) {
                Some(target) => {
                    out.bind(&object.uid, Resolved::Category {
                        name: target.to_string(),
                    });
                }
                None => {
                    out.warn(
                        "unmapped-category",
                        format!(
                            "category '{}' is not in the category dictionary",
                            object.name
                        ),
                    );
                    out.bind(&object.uid, Resolved::Unsupported);
                }
            },
            _ => {}
        }
    }
}

/// Application groups list their members' resolved application names.
///
/// Runs after the application pass; members that resolved to anything other
/// than a catalog application are skipped with a warning.
pub(super) fn translate_application_groups(export: &Export, out: &mut Translation) {
    for object in export.objects.values() {
        if object.kind != ForeignKind::ApplicationSiteGroup {
            continue;
        }
        let mut applications = Vec::new();
        for uid in object.attr_strings("members") {
            match out.resolved.get(uid) {
                Some(Resolved::Application { name }) => applications.push(name.clone()),
                _ => {
                    let member = export
                        .get(uid)
                        .map(|m| format!("{} '{}'", m.kind, m.name))
                        .unwrap_or_else(|| format!("uid {uid}"));
                    out.warn(
                        "unresolved-member",
                        format!(
                            "application group '{}' member {member} is not a catalog application, skipped",
                            object.name
                        ),
                    );
                }
            }
        }

        if applications.is_empty() {
            out.warn(
                "empty-group",
                format!(
                    "application group '{}' has no translatable members",
                    object.name
                ),
            );
            out.bind(&object.uid, Resolved::Unsupported);
            continue;
        }

        let name = sanitize_name(&object.name);
        out.push_entity(EntityBody::Group(ApplicationGroup {
            name: name.clone(),
            description: description_of(object),
            applications,
        }));
        out.bind(
            &object.uid,
            Resolved::entity(EntityKind::ApplicationGroups, name),
        );
    }
}
