//! Rule relinker: rewrites policy rules from foreign uids to the names the
//! translator resolved, one rule kind at a time.
//!
//! Reference fields drop Any and unsupported entries; an emptied field list
//! means "match anything" on the target, which is what those sentinels meant
//! at the source. Identity resolutions found in a source list move to the
//! rule's user list. A rule that references a uid with no binding at all is
//! skipped and reported; the rest of the batch continues.
//!
//! Relinked rules carry names only. No foreign uid survives into a rule
//! body.

use serde::Serialize;
use serde_json::Value;
use utm_store_core::{
    ContentRule, DosRule, EntityKind, FirewallRule, IdentityMember, RuleAction, RuleRef,
};

use crate::resolve::{Resolved, ResolutionMap};
use crate::source::{ForeignKind, ForeignObject};

/// Soft problem found while relinking; the rule still converts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelinkWarning {
    pub code: String,
    pub message: String,
}

/// A rule that could not be converted at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRule {
    pub name: String,
    pub reason: String,
}

/// Everything one relink run produced, in original rule order per kind.
#[derive(Debug, Default)]
pub struct Relinked {
    pub firewall: Vec<FirewallRule>,
    pub content: Vec<ContentRule>,
    pub dos: Vec<DosRule>,
    pub skipped: Vec<SkippedRule>,
    pub warnings: Vec<RelinkWarning>,
}

impl Relinked {
    fn warn(&mut self, code: &str, message: String) {
        self.warnings.push(RelinkWarning {
            code: code.to_string(),
            message,
        });
    }
}

/// Relink every rule through the resolution map.
pub fn relink(rules: &[ForeignObject], resolved: &ResolutionMap) -> Relinked {
    let mut out = Relinked::default();
    for rule in rules {
        let outcome = match rule.kind {
            ForeignKind::AccessRule => relink_firewall(rule, resolved, &mut out),
            ForeignKind::ContentRule => relink_content(rule, resolved, &mut out),
            ForeignKind::DosRule => relink_dos(rule, resolved, &mut out),
            _ => continue,
        };
        if let Err(reason) = outcome {
            out.skipped.push(SkippedRule {
                name: rule.name.clone(),
                reason,
            });
        }
    }
    out
}

fn relink_firewall(
    rule: &ForeignObject,
    resolved: &ResolutionMap,
    out: &mut Relinked,
) -> Result<(), String> {
    let mut users = Vec::new();
    let sources = source_refs(rule, resolved, &mut users, out)?;
    let destinations = destination_refs(rule, resolved, out)?;
    let services = service_refs(rule, resolved, out)?;
    drop_time_refs(rule, resolved, out)?;
    let action = rule_action(rule, out);

    out.firewall.push(FirewallRule {
        name: rule.name.clone(),
        description: description_of(rule),
        enabled: rule.attr_bool("enabled").unwrap_or(true),
        action,
        sources,
        destinations,
        services,
        users,
        log: rule_log(rule),
    });
    Ok(())
}

fn relink_content(
    rule: &ForeignObject,
    resolved: &ResolutionMap,
    out: &mut Relinked,
) -> Result<(), String> {
    let mut users = Vec::new();
    let sources = source_refs(rule, resolved, &mut users, out)?;
    let criteria = criteria_refs(rule, resolved, out)?;
    drop_time_refs(rule, resolved, out)?;
    let action = rule_action(rule, out);

    out.content.push(ContentRule {
        name: rule.name.clone(),
        description: description_of(rule),
        enabled: rule.attr_bool("enabled").unwrap_or(true),
        action,
        sources,
        users,
        criteria,
        log: rule_log(rule),
    });
    Ok(())
}

fn relink_dos(
    rule: &ForeignObject,
    resolved: &ResolutionMap,
    out: &mut Relinked,
) -> Result<(), String> {
    let mut users = Vec::new();
    let sources = source_refs(rule, resolved, &mut users, out)?;
    if !users.is_empty() {
        out.warn(
            "identity-misplaced",
            format!(
                "rule '{}': identity sources have no place in a flood rule, dropped",
                rule.name
            ),
        );
    }
    let destinations = destination_refs(rule, resolved, out)?;
    let services = service_refs(rule, resolved, out)?;
    let action = rule_action(rule, out);

    out.dos.push(DosRule {
        name: rule.name.clone(),
        description: description_of(rule),
        enabled: rule.attr_bool("enabled").unwrap_or(true),
        action,
        sources,
        destinations,
        services,
        log: rule_log(rule),
    });
    Ok(())
}

/// Resolve one uid-list field. The first uid without a binding fails the
/// whole rule.
fn resolve_field<'a>(
    rule: &'a ForeignObject,
    field: &str,
    resolved: &'a ResolutionMap,
) -> Result<Vec<(&'a str, &'a Resolved)>, String> {
    rule.attr_strings(field)
        .into_iter()
        .map(|uid| {
            resolved
                .get(uid)
                .map(|entry| (uid, entry))
                .ok_or_else(|| format!("field '{field}' references unknown uid {uid}"))
        })
        .collect()
}

fn source_refs(
    rule: &ForeignObject,
    resolved: &ResolutionMap,
    users: &mut Vec<IdentityMember>,
    out: &mut Relinked,
) -> Result<Vec<RuleRef>, String> {
    let mut refs = Vec::new();
    for (uid, entry) in resolve_field(rule, "source", resolved)? {
        match entry {
            Resolved::Entity { kind, name } if *kind == EntityKind::IpLists => {
                refs.push(RuleRef::IpList(name.clone()));
            }
            Resolved::Identity { members } => users.extend(members.iter().cloned()),
            Resolved::Any => {}
            Resolved::Unsupported => dropped(rule, "source", uid, out),
            other => mismatched(rule, "source", other, out),
        }
    }
    Ok(refs)
}

fn destination_refs(
    rule: &ForeignObject,
    resolved: &ResolutionMap,
    out: &mut Relinked,
) -> Result<Vec<RuleRef>, String> {
    let mut refs = Vec::new();
    for (uid, entry) in resolve_field(rule, "destination", resolved)? {
        match entry {
            Resolved::Entity { kind, name } if *kind == EntityKind::IpLists => {
                refs.push(RuleRef::IpList(name.clone()));
            }
            Resolved::Identity { .. } => out.warn(
                "identity-misplaced",
                format!(
                    "rule '{}': identity reference in destination, dropped",
                    rule.name
                ),
            ),
            Resolved::Any => {}
            Resolved::Unsupported => dropped(rule, "destination", uid, out),
            other => mismatched(rule, "destination", other, out),
        }
    }
    Ok(refs)
}

fn service_refs(
    rule: &ForeignObject,
    resolved: &ResolutionMap,
    out: &mut Relinked,
) -> Result<Vec<RuleRef>, String> {
    let mut refs = Vec::new();
    for (uid, entry) in resolve_field(rule, "service", resolved)? {
        match entry {
            Resolved::Entity { kind, name } if *kind == EntityKind::Services => {
                refs.push(RuleRef::Service(name.clone()));
            }
            Resolved::Any => {}
            Resolved::Unsupported => dropped(rule, "service", uid, out),
            other => mismatched(rule, "service", other, out),
        }
    }
    Ok(refs)
}

/// Content-rule criteria: catalog applications, categories, URL lists and
/// application groups, all in the one `application` column.
fn criteria_refs(
    rule: &ForeignObject,
    resolved: &ResolutionMap,
    out: &mut Relinked,
) -> Result<Vec<RuleRef>, String> {
    let mut refs = Vec::new();
    for (uid, entry) in resolve_field(rule, "application", resolved)? {
        match entry {
            Resolved::Application { name } => refs.push(RuleRef::App(name.clone())),
            Resolved::Category { name } => refs.push(RuleRef::Category(name.clone())),
            Resolved::Entity { kind, name } if *kind == EntityKind::UrlLists => {
                refs.push(RuleRef::UrlList(name.clone()));
            }
            Resolved::Entity { kind, name } if *kind == EntityKind::ApplicationGroups => {
                refs.push(RuleRef::AppGroup(name.clone()));
            }
            Resolved::Any => {}
            Resolved::Unsupported => dropped(rule, "application", uid, out),
            other => mismatched(rule, "application", other, out),
        }
    }
    Ok(refs)
}

/// Time references have no target equivalent; resolve them for the dangling
/// check, then drop the restriction with a note.
fn drop_time_refs(
    rule: &ForeignObject,
    resolved: &ResolutionMap,
    out: &mut Relinked,
) -> Result<(), String> {
    if !resolve_field(rule, "time", resolved)?.is_empty() {
        out.warn(
            "time-dropped",
            format!(
                "rule '{}': time restriction is not supported and was dropped",
                rule.name
            ),
        );
    }
    Ok(())
}

fn dropped(rule: &ForeignObject, field: &str, uid: &str, out: &mut Relinked) {
    out.warn(
        "dropped-ref",
        format!(
            "rule '{}': {field} reference {uid} has no target mapping, dropped",
            rule.name
        ),
    );
}

fn mismatched(rule: &ForeignObject, field: &str, entry: &Resolved, out: &mut Relinked) {
    out.warn(
        "mismatched-ref",
        format!(
            "rule '{}': {field} reference resolved to {entry:?}, which does not fit this field, dropped",
            rule.name
        ),
    );
}

/// Action mapping fails closed: anything unrecognized becomes a drop.
fn rule_action(rule: &ForeignObject, out: &mut Relinked) -> RuleAction {
    let action = rule.attr_str("action").unwrap_or("");
    if action.eq_ignore_ascii_case("accept")
        || action.eq_ignore_ascii_case("allow")
        || action.eq_ignore_ascii_case("bypass")
    {
        return RuleAction::Allow;
    }
    if action.eq_ignore_ascii_case("reject") {
        return RuleAction::Deny;
    }
    if action.eq_ignore_ascii_case("drop") || action.eq_ignore_ascii_case("prevent") {
        return RuleAction::Drop;
    }
    out.warn(
        "unknown-action",
        format!("rule '{}': action '{action}' not recognized, using drop", rule.name),
    );
    RuleAction::Drop
}

/// True iff any tracked log channel is enabled.
fn rule_log(rule: &ForeignObject) -> bool {
    let Some(Value::Object(track)) = rule.attrs.get("track") else {
        return false;
    };
    let logs = track
        .get("type")
        .and_then(Value::as_str)
        .map(|t| !t.eq_ignore_ascii_case("none"))
        .unwrap_or(false);
    let accounting = track
        .get("accounting")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let alerts = track
        .get("alert")
        .and_then(Value::as_str)
        .map(|a| !a.eq_ignore_ascii_case("none"))
        .unwrap_or(false);
    logs || accounting || alerts
}

fn description_of(rule: &ForeignObject) -> String {
    rule.attr_str("comments").unwrap_or_default().to_string()
}
