//! Static lookup tables: well-known service ports plus the URL-category and
//! application dictionaries.
//!
//! Defaults are embedded at build time; an operator can override them with a
//! TOML file of the same shape.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use utm_store_core::Protocol;

/// One well-known port: a protocol/port pair and the service catalog name
/// it collapses onto.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PortMapping {
    pub protocol: Protocol,
    pub port: String,
    pub name: String,
}

/// Vendor name -> target name dictionary row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NameMapping {
    pub from: String,
    pub to: String,
}

/// All lookup tables used by the translator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tables {
    #[serde(default)]
    pub service: Vec<PortMapping>,
    #[serde(default)]
    pub url_category: Vec<NameMapping>,
    #[serde(default)]
    pub application: Vec<NameMapping>,
}

impl Tables {
    /// Well-known service name for a protocol/port pair, exact port match.
    pub fn service_name(&self, protocol: Protocol, port: &str) -> Option<&str> {
        self.service
            .iter()
            .find(|row| row.protocol == protocol && row.port == port)
            .map(|row| row.name.as_str())
    }

    /// Target URL category for a vendor category name.
    pub fn url_category(&self, from: &str) -> Option<&str> {
        lookup(&self.url_category, from)
    }

    /// Target catalog application for a vendor application name.
    pub fn application(&self, from: &str) -> Option<&str> {
        lookup(&self.application, from)
    }

    pub fn is_empty(&self) -> bool {
        self.service.is_empty() && self.url_category.is_empty() && self.application.is_empty()
    }
}

fn lookup<'t>(rows: &'t [NameMapping], from: &str) -> Option<&'t str> {
    rows.iter()
        .find(|row| row.from.eq_ignore_ascii_case(from))
        .map(|row| row.to.as_str())
}

/// Errors returned when loading a tables file.
#[derive(Debug, Error)]
pub enum TablesError {
    #[error("failed to read tables file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse tables file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load lookup tables from a TOML file.
pub fn load_tables(path: &Path) -> Result<Tables, TablesError> {
    let raw = fs::read_to_string(path).map_err(|source| TablesError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_tables(&raw, path.display().to_string())
}

/// Built-in tables compiled into the binary.
pub fn default_tables() -> Tables {
    let embedded = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/mappings/tables.toml"));
    match parse_tables(embedded, "embedded tables".to_string()) {
        Ok(tables) if !tables.is_empty() => tables,
        _ => fallback_tables(),
    }
}

fn parse_tables(raw: &str, path: String) -> Result<Tables, TablesError> {
    toml::from_str(raw).map_err(|source| TablesError::Parse { path, source })
}

fn fallback_tables() -> Tables {
    let service = [
        (Protocol::Tcp, "22", "SSH"),
        (Protocol::Tcp, "80", "HTTP"),
        (Protocol::Tcp, "443", "HTTPS"),
        (Protocol::Udp, "53", "DNS"),
        (Protocol::Tcp, "25", "SMTP"),
    ]
    .into_iter()
    .map(|(protocol, port, name)| PortMapping {
        protocol,
        port: port.to_string(),
        name: name.to_string(),
    })
    .collect();
    Tables {
        service,
        url_category: Vec::new(),
        application: Vec::new(),
    }
}
