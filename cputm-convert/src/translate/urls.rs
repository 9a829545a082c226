//! URL list translation: application sites that carry their own `url-list`
//! become named URL lists. Sites without one are catalog applications and
//! belong to the application pass.

use utm_store_core::{EntityKind, ListType, NamedList};

use crate::resolve::Resolved;
use crate::sanitize::sanitize_name;
use crate::source::{Export, ForeignKind, ForeignObject};
use crate::translate::{description_of, EntityBody, Translation};

pub(super) fn translate_url_lists(export: &Export, out: &mut Translation) {
    for object in export.objects.values() {
        if object.kind != ForeignKind::ApplicationSite {
            continue;
        }
        let urls = site_urls(object);
        if urls.is_empty() {
            continue;
        }
        let name = sanitize_name(&object.name);
        out.push_entity(EntityBody::List(NamedList {
            name: name.clone(),
            description: description_of(object),
            list_type: ListType::Url,
            items: urls,
        }));
        out.bind(&object.uid, Resolved::entity(EntityKind::UrlLists, name));
    }
}

/// Non-empty entries of the site's `url-list`, order preserved.
pub(super) fn site_urls(object: &ForeignObject) -> Vec<String> {
    object
        .attr_strings("url-list")
        .into_iter()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}
