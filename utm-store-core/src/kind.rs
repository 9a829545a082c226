use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level section of the appliance configuration tree.
///
/// Snapshot stores group entity collections into one directory per section,
/// matching the appliance's own configuration layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeSection {
    Library,
    Network,
    Security,
}

impl TreeSection {
    pub fn as_str(self) -> &'static str {
        match self {
            TreeSection::Library => "library",
            TreeSection::Network => "network",
            TreeSection::Security => "security",
        }
    }
}

impl fmt::Display for TreeSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a stored entity collection.
///
/// Every object in the store belongs to exactly one kind; the kind decides
/// which section of the configuration tree it lives in and which snapshot
/// file holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Services,
    IpLists,
    UrlLists,
    MimeLists,
    UseragentLists,
    MorphologyLists,
    ApplicationGroups,
    Zones,
    Interfaces,
    VirtualRouters,
    FirewallRules,
    NatRules,
    ContentRules,
    DosRules,
}

/// All kinds, in tree order: library collections, then network, then security.
pub const ALL_KINDS: &[EntityKind] = &[
    EntityKind::Services,
    EntityKind::IpLists,
    EntityKind::UrlLists,
    EntityKind::MimeLists,
    EntityKind::UseragentLists,
    EntityKind::MorphologyLists,
    EntityKind::ApplicationGroups,
    EntityKind::Zones,
    EntityKind::Interfaces,
    EntityKind::VirtualRouters,
    EntityKind::FirewallRules,
    EntityKind::NatRules,
    EntityKind::ContentRules,
    EntityKind::DosRules,
];

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Services => "services",
            EntityKind::IpLists => "ip_lists",
            EntityKind::UrlLists => "url_lists",
            EntityKind::MimeLists => "mime_lists",
            EntityKind::UseragentLists => "useragent_lists",
            EntityKind::MorphologyLists => "morphology_lists",
            EntityKind::ApplicationGroups => "application_groups",
            EntityKind::Zones => "zones",
            EntityKind::Interfaces => "interfaces",
            EntityKind::VirtualRouters => "virtual_routers",
            EntityKind::FirewallRules => "firewall_rules",
            EntityKind::NatRules => "nat_rules",
            EntityKind::ContentRules => "content_rules",
            EntityKind::DosRules => "dos_rules",
        }
    }

    /// Section of the configuration tree this kind belongs to.
    pub fn section(self) -> TreeSection {
        match self {
            EntityKind::Services
            | EntityKind::IpLists
            | EntityKind::UrlLists
            | EntityKind::MimeLists
            | EntityKind::UseragentLists
            | EntityKind::MorphologyLists
            | EntityKind::ApplicationGroups => TreeSection::Library,
            EntityKind::Zones | EntityKind::Interfaces | EntityKind::VirtualRouters => {
                TreeSection::Network
            }
            EntityKind::FirewallRules
            | EntityKind::NatRules
            | EntityKind::ContentRules
            | EntityKind::DosRules => TreeSection::Security,
        }
    }

    /// Snapshot file name within the kind's section directory.
    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }

    /// Look a kind up by its collection name.
    pub fn from_name(name: &str) -> Option<EntityKind> {
        ALL_KINDS.iter().copied().find(|k| k.as_str() == name)
    }

    /// Whether entities of this kind are policy rules rather than library
    /// or network objects. Rules are ordered; everything else is keyed by
    /// name alone.
    pub fn is_rule(self) -> bool {
        self.section() == TreeSection::Security
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_names() {
        for kind in ALL_KINDS {
            assert_eq!(EntityKind::from_name(kind.as_str()), Some(*kind));
        }
        assert_eq!(EntityKind::from_name("no_such_kind"), None);
    }

    #[test]
    fn sections_cover_tree_layout() {
        assert_eq!(EntityKind::Services.section(), TreeSection::Library);
        assert_eq!(EntityKind::Zones.section(), TreeSection::Network);
        assert_eq!(EntityKind::FirewallRules.section(), TreeSection::Security);
        assert_eq!(EntityKind::Services.file_name(), "services.json");
    }

    #[test]
    fn rule_kinds_are_security_section() {
        assert!(EntityKind::FirewallRules.is_rule());
        assert!(EntityKind::DosRules.is_rule());
        assert!(!EntityKind::Services.is_rule());
        assert!(!EntityKind::Interfaces.is_rule());
    }
}
