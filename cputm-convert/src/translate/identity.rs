//! Access-role translation: directory identities for the rule user lists.

use serde_json::Value;
use utm_store_core::{IdentityKind, IdentityMember};

use crate::resolve::Resolved;
use crate::source::{Export, ForeignKind};
use crate::translate::Translation;

pub(super) fn translate_access_roles(export: &Export, out: &mut Translation) {
    for object in export.objects.values() {
        if object.kind != ForeignKind::AccessRole {
            continue;
        }
        let mut members = Vec::new();
        for entry in member_tooltips(object.attrs.get("users")) {
            match parse_member_tooltip(&entry) {
                Some(member) => members.push(member),
                None => out.warn(
                    "bad-identity",
                    format!(
                        "access role '{}' member '{entry}' is not in a recognized form, skipped",
                        object.name
                    ),
                ),
            }
        }
        out.bind(&object.uid, Resolved::Identity { members });
    }
}

/// Tooltip lines of the role's `users` array. Entries are either plain
/// strings or objects carrying `tooltiptext`.
fn member_tooltips(users: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(entries)) = users else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(text) => Some(text.clone()),
            Value::Object(fields) => fields
                .get("tooltiptext")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
        .collect()
}

/// Parse one access-role member out of its tooltip line.
///
/// The expected shape is `<label>: <DOMAIN>\<name>`, as in
/// `User: CORP\jsmith` or `User Group: CORP\Domain Admins`; a label
/// containing "group" marks a directory group. Returns `None` when the
/// colon or the backslash is missing or either half of the account is
/// empty; the member cannot be reconstructed from such a line and the
/// caller is expected to skip it.
pub fn parse_member_tooltip(tooltip: &str) -> Option<IdentityMember> {
    let (label, account) = tooltip.split_once(':')?;
    let (domain, name) = account.trim().split_once('\\')?;
    let domain = domain.trim();
    let name = name.trim();
    if domain.is_empty() || name.is_empty() {
        return None;
    }
    let kind = if label.to_ascii_lowercase().contains("group") {
        IdentityKind::Group
    } else {
        IdentityKind::User
    };
    Some(IdentityMember {
        kind,
        name: format!("{domain}\\{name}"),
    })
}
