//! Typed bodies for the entities the converter produces.
//!
//! Entities are keyed by `name` throughout; the store assigns opaque ids and
//! rules reference other entities by name, never by id.

use serde::{Deserialize, Serialize};

use crate::kind::EntityKind;

/// Transport protocol of a service entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    Tcp,
    Udp,
}

/// One protocol/port row of a service.
///
/// Ports stay textual so ranges (`1024-2048`) survive unchanged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProtocolEntry {
    pub protocol: Protocol,
    pub port: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port: Option<String>,
}

/// Entry in the appliance's service catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub protocols: Vec<ProtocolEntry>,
}

impl Service {
    pub fn kind(&self) -> EntityKind {
        EntityKind::Services
    }
}

/// Family a named list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListType {
    Ip,
    Url,
    Mime,
    Useragent,
    Morphology,
}

impl ListType {
    pub fn kind(self) -> EntityKind {
        match self {
            ListType::Ip => EntityKind::IpLists,
            ListType::Url => EntityKind::UrlLists,
            ListType::Mime => EntityKind::MimeLists,
            ListType::Useragent => EntityKind::UseragentLists,
            ListType::Morphology => EntityKind::MorphologyLists,
        }
    }
}

/// Reusable named collection of values (addresses, URLs, MIME types, ...)
/// referenced from security rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedList {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub list_type: ListType,
    pub items: Vec<String>,
}

impl NamedList {
    pub fn kind(&self) -> EntityKind {
        self.list_type.kind()
    }
}

/// Named group of catalog applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationGroup {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub applications: Vec<String>,
}

impl ApplicationGroup {
    pub fn kind(&self) -> EntityKind {
        EntityKind::ApplicationGroups
    }
}

/// What a rule does with matching traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    Allow,
    Deny,
    Drop,
}

/// Reference from a rule field to a named entity or a literal value.
///
/// An empty reference list on a rule field means "match anything".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum RuleRef {
    Service(String),
    IpList(String),
    UrlList(String),
    AppGroup(String),
    App(String),
    Category(String),
    Literal(String),
}

impl RuleRef {
    pub fn name(&self) -> &str {
        match self {
            RuleRef::Service(name)
            | RuleRef::IpList(name)
            | RuleRef::UrlList(name)
            | RuleRef::AppGroup(name)
            | RuleRef::App(name)
            | RuleRef::Category(name)
            | RuleRef::Literal(name) => name,
        }
    }
}

/// Whether an identity entry names a single account or a directory group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
    User,
    Group,
}

/// Directory identity in `DOMAIN\name` form, as rules match on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityMember {
    pub kind: IdentityKind,
    pub name: String,
}

/// Traffic-filtering rule. Rule order is match order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub enabled: bool,
    pub action: RuleAction,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<RuleRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destinations: Vec<RuleRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<RuleRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<IdentityMember>,
    pub log: bool,
}

/// Web/application filtering rule.
///
/// The `criteria` list mixes catalog applications, built-in URL categories,
/// URL lists and application groups; the tagged reference form keeps them
/// apart on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRule {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub enabled: bool,
    pub action: RuleAction,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<RuleRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<IdentityMember>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub criteria: Vec<RuleRef>,
    pub log: bool,
}

/// Flood-protection rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DosRule {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub enabled: bool,
    pub action: RuleAction,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<RuleRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destinations: Vec<RuleRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<RuleRef>,
    pub log: bool,
}
