//! Source extractor: loads a SmartConsole JSON export into a flat
//! `uid -> object` map plus the ordered list of policy rules.
//!
//! The export is one JSON array; every element carries `type` and `uid`.
//! The loaded map is read-only input for the translator, which records its
//! results in a separate resolution map and never writes back here.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

/// Object `type` discriminators this converter understands.
///
/// The list is closed; anything else lands in `Unknown` with the original
/// type string preserved, so unrecognized objects survive untouched and can
/// be surfaced by `inspect` and `check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForeignKind {
    ServiceTcp,
    ServiceUdp,
    ServiceIcmp,
    ServiceIcmp6,
    ServiceGroup,
    Host,
    Network,
    AddressRange,
    NetworkGroup,
    ApplicationSite,
    ApplicationSiteCategory,
    ApplicationSiteGroup,
    AccessRole,
    Time,
    Any,
    AccessRule,
    ContentRule,
    DosRule,
    Unknown(String),
}

impl ForeignKind {
    pub fn from_type(type_name: &str) -> ForeignKind {
        match type_name {
            "service-tcp" => ForeignKind::ServiceTcp,
            "service-udp" => ForeignKind::ServiceUdp,
            "service-icmp" => ForeignKind::ServiceIcmp,
            "service-icmp6" => ForeignKind::ServiceIcmp6,
            "service-group" => ForeignKind::ServiceGroup,
            "host" => ForeignKind::Host,
            "network" => ForeignKind::Network,
            "address-range" => ForeignKind::AddressRange,
            "group" => ForeignKind::NetworkGroup,
            "application-site" => ForeignKind::ApplicationSite,
            "application-site-category" => ForeignKind::ApplicationSiteCategory,
            "application-site-group" => ForeignKind::ApplicationSiteGroup,
            "access-role" => ForeignKind::AccessRole,
            "time" => ForeignKind::Time,
            "CpmiAnyObject" => ForeignKind::Any,
            "access-rule" => ForeignKind::AccessRule,
            "content-rule" => ForeignKind::ContentRule,
            "dos-rule" => ForeignKind::DosRule,
            other => ForeignKind::Unknown(other.to_string()),
        }
    }

    /// The export's `type` string for this kind.
    pub fn type_name(&self) -> &str {
        match self {
            ForeignKind::ServiceTcp => "service-tcp",
            ForeignKind::ServiceUdp => "service-udp",
            ForeignKind::ServiceIcmp => "service-icmp",
            ForeignKind::ServiceIcmp6 => "service-icmp6",
            ForeignKind::ServiceGroup => "service-group",
            ForeignKind::Host => "host",
            ForeignKind::Network => "network",
            ForeignKind::AddressRange => "address-range",
            ForeignKind::NetworkGroup => "group",
            ForeignKind::ApplicationSite => "application-site",
            ForeignKind::ApplicationSiteCategory => "application-site-category",
            ForeignKind::ApplicationSiteGroup => "application-site-group",
            ForeignKind::AccessRole => "access-role",
            ForeignKind::Time => "time",
            ForeignKind::Any => "CpmiAnyObject",
            ForeignKind::AccessRule => "access-rule",
            ForeignKind::ContentRule => "content-rule",
            ForeignKind::DosRule => "dos-rule",
            ForeignKind::Unknown(name) => name,
        }
    }

    /// Rules are extracted into the ordered rule list, not the object map.
    pub fn is_rule(&self) -> bool {
        matches!(
            self,
            ForeignKind::AccessRule | ForeignKind::ContentRule | ForeignKind::DosRule
        )
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ForeignKind::Unknown(_))
    }
}

impl fmt::Display for ForeignKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// One object from the export, with its full attribute map preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignObject {
    pub uid: String,
    pub kind: ForeignKind,
    pub name: String,
    pub attrs: Map<String, Value>,
}

impl ForeignObject {
    /// String attribute, trimmed; `None` when absent or not a string.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Value::as_str).map(str::trim)
    }

    /// Attribute as text, accepting strings, numbers and booleans.
    ///
    /// Exports are inconsistent about ports: older builds emit `"22"`,
    /// newer ones `22`.
    pub fn attr_text(&self, key: &str) -> Option<String> {
        match self.attrs.get(key)? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Boolean attribute; `None` when absent or not a boolean.
    pub fn attr_bool(&self, key: &str) -> Option<bool> {
        self.attrs.get(key).and_then(Value::as_bool)
    }

    /// String-array attribute (`members`, `url-list`, rule reference
    /// fields).
    pub fn attr_strings(&self, key: &str) -> Vec<&str> {
        let Some(Value::Array(raw)) = self.attrs.get(key) else {
            return Vec::new();
        };
        raw.iter().filter_map(Value::as_str).collect()
    }
}

/// A loaded export: plain objects keyed by uid, rules in policy order.
#[derive(Debug, Default)]
pub struct Export {
    pub objects: BTreeMap<String, ForeignObject>,
    pub rules: Vec<ForeignObject>,
    pub warnings: Vec<String>,
}

impl Export {
    pub fn get(&self, uid: &str) -> Option<&ForeignObject> {
        self.objects.get(uid)
    }

    /// Count of objects (rules excluded) per type string.
    pub fn kind_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for object in self.objects.values() {
            *counts.entry(object.kind.type_name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Distinct unrecognized type strings present in the export.
    pub fn unknown_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .objects
            .values()
            .filter_map(|object| match &object.kind {
                ForeignKind::Unknown(name) => Some(name.clone()),
                _ => None,
            })
            .collect();
        types.sort();
        types.dedup();
        types
    }
}

/// Errors returned when loading an export file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to read export file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse export file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("export file {path} is not a JSON array of objects")]
    NotAnArray { path: String },
}

/// Load an export file.
///
/// Elements without a `uid` or (for plain objects) without a `name` are
/// skipped with a warning; rules without a name get a positional one. A
/// duplicated uid keeps the first occurrence.
pub fn load_export(path: &Path) -> Result<Export, ExportError> {
    let raw = fs::read_to_string(path).map_err(|source| ExportError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let parsed: Value = serde_json::from_str(&raw).map_err(|source| ExportError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    let Value::Array(elements) = parsed else {
        return Err(ExportError::NotAnArray {
            path: path.display().to_string(),
        });
    };

    let mut export = Export::default();
    for (position, element) in elements.into_iter().enumerate() {
        let Value::Object(attrs) = element else {
            export
                .warnings
                .push(format!("element {position} is not an object, skipped"));
            continue;
        };
        let kind = match attrs.get("type").and_then(Value::as_str) {
            Some(type_name) => ForeignKind::from_type(type_name),
            None => {
                export
                    .warnings
                    .push(format!("element {position} has no type, skipped"));
                continue;
            }
        };
        let Some(uid) = attrs.get("uid").and_then(Value::as_str).map(str::to_string) else {
            export
                .warnings
                .push(format!("element {position} ({kind}) has no uid, skipped"));
            continue;
        };
        let name = attrs
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        if kind.is_rule() {
            let name = name.unwrap_or_else(|| format!("{} {}", kind, export.rules.len() + 1));
            export.rules.push(ForeignObject {
                uid,
                kind,
                name,
                attrs,
            });
            continue;
        }

        let Some(name) = name else {
            export
                .warnings
                .push(format!("object {uid} ({kind}) has no name, skipped"));
            continue;
        };
        if export.objects.contains_key(&uid) {
            export
                .warnings
                .push(format!("duplicate uid {uid}, keeping the first occurrence"));
            continue;
        }
        export.objects.insert(
            uid.clone(),
            ForeignObject {
                uid,
                kind,
                name,
                attrs,
            },
        );
    }

    Ok(export)
}
