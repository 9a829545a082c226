use std::collections::BTreeMap;

use serde::Serialize;

use crate::source::Export;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub objects: usize,
    pub rules: usize,
    pub kinds: BTreeMap<String, Vec<String>>,
}

/// Group an export's contents by type string, optionally keeping one type
/// only. Plain objects list alphabetically; rules keep policy order.
pub fn build_inspect_report(export: &Export, kind_filter: Option<&str>) -> InspectReport {
    let mut kinds: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for object in export.objects.values() {
        kinds
            .entry(object.kind.type_name().to_string())
            .or_default()
            .push(object.name.clone());
    }
    for names in kinds.values_mut() {
        names.sort();
    }
    for rule in &export.rules {
        kinds
            .entry(rule.kind.type_name().to_string())
            .or_default()
            .push(rule.name.clone());
    }

    if let Some(filter) = kind_filter {
        kinds.retain(|type_name, _| type_name.eq_ignore_ascii_case(filter));
    }

    InspectReport {
        objects: export.objects.len(),
        rules: export.rules.len(),
        kinds,
    }
}

pub fn render_inspect_text(report: &InspectReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "export objects={} rules={}\n",
        report.objects, report.rules
    ));
    for (type_name, names) in &report.kinds {
        out.push_str(&format!("{} ({})\n", type_name, names.len()));
        for name in names {
            out.push_str(&format!("- {name}\n"));
        }
    }
    out
}
