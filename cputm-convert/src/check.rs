//! Export readiness assessment.
//!
//! Runs the conversion pipeline dry, without writing anything, and reports
//! what a real run would produce:
//!
//! - Object and rule counts per export type
//! - Unknown object types and the rules they would take down
//! - Services with no port catalog entry
//! - Categories and applications with no dictionary mapping
//! - Rules that cannot be relinked
//!
//! The report closes with recommendations so a check run gives a go/no-go
//! answer before anyone touches a target box.

use std::collections::BTreeMap;

use serde::Serialize;
use utm_store_core::Protocol;

use crate::relink::relink;
use crate::source::{Export, ForeignKind};
use crate::tables::Tables;
use crate::translate::translate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub objects: usize,
    pub rules: usize,
    pub tables_source: String,
    pub kind_counts: BTreeMap<String, usize>,
    pub load_warnings: Vec<String>,
    pub unknown_types: Vec<String>,
    pub catalog_misses: Vec<String>,
    pub unmapped_categories: Vec<String>,
    pub unmapped_applications: Vec<String>,
    pub skipped_rules: Vec<String>,
    pub convert_warnings: usize,
    pub entity_counts: BTreeMap<String, usize>,
    pub recommendations: Vec<String>,
}

/// Build a readiness report for one export against one table set.
pub fn build_check_report(export: &Export, tables: &Tables, tables_source: &str) -> CheckReport {
    let translation = translate(export, tables);
    let relinked = relink(&export.rules, &translation.resolved);

    let mut entity_counts = BTreeMap::new();
    for entity in &translation.entities {
        *entity_counts
            .entry(entity.kind().as_str().to_string())
            .or_insert(0) += 1;
    }
    for (kind, count) in [
        ("firewall_rules", relinked.firewall.len()),
        ("content_rules", relinked.content.len()),
        ("dos_rules", relinked.dos.len()),
    ] {
        if count > 0 {
            entity_counts.insert(kind.to_string(), count);
        }
    }

    let unknown_types = export.unknown_types();
    let catalog_misses = catalog_misses(export, tables);
    let unmapped_categories = unmapped_categories(export, tables);
    let unmapped_applications = unmapped_applications(export, tables);
    let skipped_rules = relinked
        .skipped
        .iter()
        .map(|skip| format!("{}: {}", skip.name, skip.reason))
        .collect::<Vec<_>>();

    let mut recommendations = Vec::new();
    if !unknown_types.is_empty() {
        recommendations.push(
            "unknown object types present; rules referencing them will be skipped".to_string(),
        );
    }
    if !catalog_misses.is_empty() {
        recommendations.push(
            "some services have no port catalog entry and keep their source names; extend the service table to collapse them"
                .to_string(),
        );
    }
    if !unmapped_categories.is_empty() || !unmapped_applications.is_empty() {
        recommendations.push(
            "unmapped categories or applications will be dropped from content rules; extend the dictionary tables"
                .to_string(),
        );
    }
    if !skipped_rules.is_empty() {
        recommendations.push(format!(
            "{} rules cannot be relinked; fix the export or accept the skips",
            skipped_rules.len()
        ));
    }
    if recommendations.is_empty() {
        recommendations
            .push("no blockers detected; run convert to produce the import tree".to_string());
    }

    CheckReport {
        objects: export.objects.len(),
        rules: export.rules.len(),
        tables_source: tables_source.to_string(),
        kind_counts: export.kind_counts(),
        load_warnings: export.warnings.clone(),
        unknown_types,
        catalog_misses,
        unmapped_categories,
        unmapped_applications,
        skipped_rules,
        convert_warnings: translation.warnings.len() + relinked.warnings.len(),
        entity_counts,
        recommendations,
    }
}

pub fn render_check_text(report: &CheckReport, verbose: bool) -> String {
    let mut out = Vec::new();
    out.push(format!(
        "check objects={} rules={} warnings={}",
        report.objects, report.rules, report.convert_warnings
    ));
    if verbose {
        out.push(format!("Using tables: {}", report.tables_source));
    }
    out.push("object_types".to_string());
    append_counts(&mut out, &report.kind_counts);
    if verbose {
        out.push("load_warnings".to_string());
        append_list(&mut out, &report.load_warnings);
    }
    out.push("unknown_types".to_string());
    append_list(&mut out, &report.unknown_types);
    out.push("catalog_misses".to_string());
    append_list(&mut out, &report.catalog_misses);
    out.push("unmapped_categories".to_string());
    append_list(&mut out, &report.unmapped_categories);
    out.push("unmapped_applications".to_string());
    append_list(&mut out, &report.unmapped_applications);
    out.push("skipped_rules".to_string());
    append_list(&mut out, &report.skipped_rules);
    out.push("converted_entities".to_string());
    append_counts(&mut out, &report.entity_counts);
    out.push("recommendations".to_string());
    append_list(&mut out, &report.recommendations);
    out.join("\n")
}

fn append_list(out: &mut Vec<String>, items: &[String]) {
    if items.is_empty() {
        out.push("- none".to_string());
        return;
    }
    for item in items {
        out.push(format!("- {item}"));
    }
}

fn append_counts(out: &mut Vec<String>, counts: &BTreeMap<String, usize>) {
    if counts.is_empty() {
        out.push("- none".to_string());
        return;
    }
    for (name, count) in counts {
        out.push(format!("- {name}: {count}"));
    }
}

/// Port services the catalog cannot collapse; they will keep their source
/// names in the output.
fn catalog_misses(export: &Export, tables: &Tables) -> Vec<String> {
    let mut misses = Vec::new();
    for object in export.objects.values() {
        let protocol = match object.kind {
            ForeignKind::ServiceTcp => Protocol::Tcp,
            ForeignKind::ServiceUdp => Protocol::Udp,
            _ => continue,
        };
        let Some(port) = object.attr_text("port").filter(|p| !p.is_empty()) else {
            continue;
        };
        if tables.service_name(protocol, &port).is_none() {
            misses.push(format!("{} ({}/{port})", object.name, object.kind));
        }
    }
    misses
}

fn unmapped_categories(export: &Export, tables: &Tables) -> Vec<String> {
    export
        .objects
        .values()
        .filter(|object| object.kind == ForeignKind::ApplicationSiteCategory)
        .filter(|object| tables.url_category(&object.name).is_none())
        .map(|object| object.name.clone())
        .collect()
}

fn unmapped_applications(export: &Export, tables: &Tables) -> Vec<String> {
    export
        .objects
        .values()
        .filter(|object| object.kind == ForeignKind::ApplicationSite)
        .filter(|object| {
            object
                .attr_strings("url-list")
                .iter()
                .all(|url| url.trim().is_empty())
        })
        .filter(|object| tables.application(&object.name).is_none())
        .map(|object| object.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::source::load_export;
    use crate::tables::default_tables;

    use super::*;

    fn export_from(objects: serde_json::Value) -> Export {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        std::fs::write(&path, objects.to_string()).unwrap();
        load_export(&path).unwrap()
    }

    #[test]
    fn report_counts_misses_and_unknowns() {
        let export = export_from(json!([
            {"uid": "u1", "type": "service-tcp", "name": "ssh", "port": "22"},
            {"uid": "u2", "type": "service-tcp", "name": "telemetry", "port": "2701"},
            {"uid": "u3", "type": "vpn-community-meshed", "name": "office mesh"},
            {"uid": "u4", "type": "application-site-category", "name": "Made Up Category"},
        ]));
        let report = build_check_report(&export, &default_tables(), "embedded");

        assert_eq!(report.objects, 4);
        assert_eq!(report.catalog_misses, vec!["telemetry (service-tcp/2701)"]);
        assert_eq!(report.unknown_types, vec!["vpn-community-meshed"]);
        assert_eq!(report.unmapped_categories, vec!["Made Up Category"]);
        assert!(!report.recommendations.is_empty());
    }

    #[test]
    fn clean_export_recommends_conversion() {
        let export = export_from(json!([
            {"uid": "u1", "type": "service-tcp", "name": "ssh", "port": "22"},
        ]));
        let report = build_check_report(&export, &default_tables(), "embedded");

        assert!(report.catalog_misses.is_empty());
        assert_eq!(
            report.recommendations,
            vec!["no blockers detected; run convert to produce the import tree".to_string()]
        );
    }

    #[test]
    fn skipped_rules_surface_in_the_report() {
        let export = export_from(json!([
            {"uid": "u1", "type": "service-tcp", "name": "ssh", "port": "22"},
            {"uid": "r1", "type": "access-rule", "name": "broken",
             "action": "accept", "service": ["no-such-uid"]},
        ]));
        let report = build_check_report(&export, &default_tables(), "embedded");

        assert_eq!(report.skipped_rules.len(), 1);
        assert!(report.skipped_rules[0].starts_with("broken:"));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("cannot be relinked")));
    }
}
