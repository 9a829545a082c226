use serde::Serialize;

use crate::relink::Relinked;
use crate::translate::Translation;
use utm_store_core::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    pub services: usize,
    pub ip_lists: usize,
    pub url_lists: usize,
    pub application_groups: usize,
    pub firewall_rules: usize,
    pub content_rules: usize,
    pub dos_rules: usize,
    pub skipped_rules: usize,
    pub warnings: usize,
}

pub fn summarize(translation: &Translation, relinked: &Relinked) -> ConversionSummary {
    ConversionSummary {
        services: count_kind(translation, EntityKind::Services),
        ip_lists: count_kind(translation, EntityKind::IpLists),
        url_lists: count_kind(translation, EntityKind::UrlLists),
        application_groups: count_kind(translation, EntityKind::ApplicationGroups),
        firewall_rules: relinked.firewall.len(),
        content_rules: relinked.content.len(),
        dos_rules: relinked.dos.len(),
        skipped_rules: relinked.skipped.len(),
        warnings: translation.warnings.len() + relinked.warnings.len(),
    }
}

pub fn render(summary: ConversionSummary) -> String {
    format!(
        "convert_summary services={} ip_lists={} url_lists={} application_groups={} firewall_rules={} content_rules={} dos_rules={} skipped_rules={} warnings={}",
        summary.services,
        summary.ip_lists,
        summary.url_lists,
        summary.application_groups,
        summary.firewall_rules,
        summary.content_rules,
        summary.dos_rules,
        summary.skipped_rules,
        summary.warnings
    )
}

fn count_kind(translation: &Translation, kind: EntityKind) -> usize {
    translation
        .entities
        .iter()
        .filter(|entity| entity.kind() == kind)
        .count()
}
